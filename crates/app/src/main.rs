//! huffpack: command-line front end for huffpack-core.

mod config;
mod input_gen;

use std::process::ExitCode;

use config::{print_help, Command, Config};
use huffpack_core::{compress_file, decompress_file, Metrics};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("run `huffpack --help` for usage");
            return ExitCode::from(2);
        }
    };

    if config.command == Command::Help {
        print_help();
        return ExitCode::SUCCESS;
    }

    init_logging(config.log_level);

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(Some(metrics)) => {
            if config.print_metrics {
                metrics.print_summary();
            }
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("huffpack: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<Level>) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level, rust_log.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// RUST_LOG directives with `info` as the fallback level. An explicit
/// `--verbose`/`--quiet` level replaces the global level from RUST_LOG.
fn log_filter(level: Option<Level>, rust_log: Option<&str>) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .parse_lossy(rust_log.unwrap_or_default());
    match level {
        Some(level) => filter.add_directive(level.into()),
        None => filter,
    }
}

/// Execute the configured command. Returns metrics for compress/decompress.
fn run(config: &Config) -> huffpack_core::Result<Option<Metrics>> {
    match config.command {
        Command::Compress => {
            let input = required_input(config)?;
            compress_file(input, &config.output_file).map(Some)
        }
        Command::Decompress => {
            let input = required_input(config)?;
            decompress_file(input, &config.output_file).map(Some)
        }
        Command::Sample => {
            input_gen::write_sample_file(&config.output_file, config.seed, config.sample_bytes)?;
            tracing::info!(
                "wrote {} sample bytes to {} (seed {})",
                config.sample_bytes,
                config.output_file.display(),
                config.seed
            );
            Ok(None)
        }
        Command::Help => Ok(None),
    }
}

fn required_input(config: &Config) -> huffpack_core::Result<&std::path::Path> {
    config.input_file.as_deref().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "no input file given").into()
    })
}
