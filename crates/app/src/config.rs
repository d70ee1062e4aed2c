//! Configuration for the huffpack application.
//!
//! Handles parsing command-line arguments and deriving defaults. Output
//! paths default to the core's naming rules so that
//! `huffpack compress notes.txt` followed by
//! `huffpack decompress notes.txt.huf` restores `notes.txt`.

use huffpack_core::{compressed_path, decompressed_path};
use std::path::PathBuf;
use tracing::Level;

/// Default size of a generated sample file (1 MiB).
const DEFAULT_SAMPLE_BYTES: usize = 1 << 20;

/// Default path of a generated sample file.
const DEFAULT_SAMPLE_PATH: &str = "./sample.bin";

/// What the run should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Compress,
    Decompress,
    Sample,
    Help,
}

impl Command {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "compress" | "c" => Some(Command::Compress),
            "decompress" | "d" => Some(Command::Decompress),
            "sample" => Some(Command::Sample),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input file path (unused by `sample`)
    pub input_file: Option<PathBuf>,

    /// Output file path
    pub output_file: PathBuf,

    // === Sample generation ===
    /// Seed for sample data
    pub seed: u64,

    /// Size of sample data in bytes
    pub sample_bytes: usize,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,

    /// Log level forced by `--verbose`/`--quiet`; `None` leaves it to
    /// RUST_LOG (default info)
    pub log_level: Option<Level>,
}

impl Config {
    /// Parse configuration from command-line arguments (program name
    /// excluded).
    ///
    /// The first argument is the command. `compress` and `decompress` take
    /// their input either as `--in <PATH>` or as a bare path.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let Some(first) = args.first() else {
            return Err("missing command (try --help)".to_string());
        };
        if first == "--help" || first == "-h" {
            return Ok(Self::help());
        }
        let command =
            Command::parse(first).ok_or_else(|| format!("unknown command: {}", first))?;

        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut print_config = false;
        let mut print_metrics = true;
        let mut log_level = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--in" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--in requires a path".to_string());
                    }
                    input_file = Some(PathBuf::from(&args[i]));
                }
                "--out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output_file = Some(PathBuf::from(&args[i]));
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    sample_bytes = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--verbose" | "-v" => {
                    log_level = Some(Level::DEBUG);
                }
                "--quiet" | "-q" => {
                    log_level = Some(Level::WARN);
                }
                "--help" | "-h" => {
                    return Ok(Self::help());
                }
                arg if !arg.starts_with('-') && input_file.is_none() => {
                    input_file = Some(PathBuf::from(arg));
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        let output_file = match command {
            Command::Compress | Command::Decompress => {
                let input = input_file
                    .as_deref()
                    .ok_or_else(|| format!("{} requires an input file", first))?;
                output_file.unwrap_or_else(|| {
                    if command == Command::Compress {
                        compressed_path(input)
                    } else {
                        decompressed_path(input)
                    }
                })
            }
            Command::Sample => output_file.unwrap_or_else(|| PathBuf::from(DEFAULT_SAMPLE_PATH)),
            Command::Help => return Ok(Self::help()),
        };

        if input_file.as_deref() == Some(output_file.as_path()) {
            return Err("input and output must be different files".to_string());
        }

        // Explicit seed, or time-based so repeated samples differ
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            command,
            input_file,
            output_file,
            seed,
            sample_bytes: sample_bytes.unwrap_or(DEFAULT_SAMPLE_BYTES),
            print_config,
            print_metrics,
            log_level,
        })
    }

    fn help() -> Self {
        Config {
            command: Command::Help,
            input_file: None,
            output_file: PathBuf::new(),
            seed: 0,
            sample_bytes: 0,
            print_config: false,
            print_metrics: false,
            log_level: None,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Command:     {:?}", self.command);
        match &self.input_file {
            Some(path) => println!("Input file:  {}", path.display()),
            None => println!("Input file:  (none)"),
        }
        println!("Output file: {}", self.output_file.display());
        if self.command == Command::Sample {
            println!("Seed: {}", self.seed);
            println!(
                "Sample size: {} bytes ({} KiB)",
                self.sample_bytes,
                self.sample_bytes / 1024
            );
        }
        match self.log_level {
            Some(level) => println!("Log level: {}", level),
            None => println!("Log level: from RUST_LOG (default info)"),
        }
        println!();
    }
}

pub fn print_help() {
    println!("huffpack: static Huffman file compression");
    println!();
    println!("USAGE:");
    println!("    huffpack <COMMAND> [PATH] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    compress, c             Compress a file (default output: <PATH>.huf)");
    println!("    decompress, d           Decompress a file (default output: <PATH> without .huf)");
    println!("    sample                  Write a generated sample file");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>             Input file (or give it as a bare PATH)");
    println!("    --out <PATH>            Output file");
    println!("    --seed <N>              Seed for sample data (default: time-based)");
    println!("    --size <N>              Sample size in bytes (default: 1048576)");
    println!();
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --verbose, -v           Debug logging");
    println!("    --quiet, -q             Warnings and errors only");
    println!("    --help, -h              Print this help");
    println!();
    println!("RUST_LOG sets the log level (default info), e.g. RUST_LOG=huffpack_core=trace.");
    println!("--verbose and --quiet take precedence over its global level.");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack sample --seed 42 --size 65536       # Reproducible test input");
    println!("    huffpack compress sample.bin                 # Writes sample.bin.huf");
    println!("    huffpack decompress sample.bin.huf --out x   # Restores into x");
    println!();
}
