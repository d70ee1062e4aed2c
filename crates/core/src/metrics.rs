//! Metrics for a single compression or decompression run.
//!
//! Counters are filled in by the file driver as each stage finishes; the
//! caller decides whether to print or export them.

use std::time::{Duration, Instant};

/// Which way a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

impl Direction {
    /// Lowercase name used in reports and exported text.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Compress => "compress",
            Direction::Decompress => "decompress",
        }
    }
}

/// Counters and timing for one run.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub direction: Direction,

    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed bytes (read when compressing, written when decompressing)
    pub raw_bytes: u64,

    /// Compressed bytes (written when compressing, read when decompressing)
    pub compressed_bytes: u64,

    /// Bits spent on the code table header
    pub header_bits: u64,

    /// Bits spent on the body, sentinel included
    pub body_bits: u64,

    /// Body bits spent on source bytes only
    pub code_bits: u64,

    // === Code table ===
    /// Symbols encoded or decoded (sentinel excluded)
    pub symbols: u64,

    /// Entries in the code table (sentinel included)
    pub distinct_symbols: usize,

    /// Longest code in the table
    pub max_code_len: usize,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            compressed_bytes: 0,
            header_bits: 0,
            body_bits: 0,
            code_bits: 0,
            symbols: 0,
            distinct_symbols: 0,
            max_code_len: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compression ratio (compressed / raw); 0.0 when nothing was read.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average code length in bits per source byte.
    pub fn average_code_length(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.code_bits as f64 / self.symbols as f64
        }
    }

    /// Throughput over uncompressed bytes, in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== {} Summary ===", capitalize(self.direction.as_str()));
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Sizes ===");
        println!("Raw:        {} bytes ({:.2} MiB)", self.raw_bytes, mib(self.raw_bytes));
        println!(
            "Compressed: {} bytes ({:.2} MiB)",
            self.compressed_bytes,
            mib(self.compressed_bytes)
        );
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Code Table ===");
        println!("Symbols: {}", self.symbols);
        println!("Table entries: {}", self.distinct_symbols);
        println!("Longest code: {} bits", self.max_code_len);
        if self.direction == Direction::Compress {
            println!("Header: {} bits", self.header_bits);
            println!("Body: {} bits", self.body_bits);
            println!("Average code length: {:.3} bits", self.average_code_length());
        }
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as key=value lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "direction={}\n\
             duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             header_bits={}\n\
             body_bits={}\n\
             symbols={}\n\
             distinct_symbols={}\n\
             max_code_len={}\n\
             average_code_length={:.4}\n",
            self.direction.as_str(),
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.header_bits,
            self.body_bits,
            self.symbols,
            self.distinct_symbols,
            self.max_code_len,
            self.average_code_length(),
        )
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new(Direction::Compress);
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100);
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new(Direction::Compress);
        assert_eq!(metrics.compression_ratio(), 0.0);

        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 750;
        assert_eq!(metrics.compression_ratio(), 0.75);
    }

    #[test]
    fn test_average_code_length() {
        let mut metrics = Metrics::new(Direction::Compress);
        assert_eq!(metrics.average_code_length(), 0.0);

        metrics.symbols = 4;
        metrics.code_bits = 5;
        assert_eq!(metrics.average_code_length(), 1.25);
    }

    #[test]
    fn test_throughput() {
        let mut metrics = Metrics::new(Direction::Decompress);
        metrics.raw_bytes = 1_000_000;

        std::thread::sleep(Duration::from_millis(20));
        metrics.complete();

        assert!(metrics.throughput_bps() > 0.0);
        assert_eq!(metrics.duration(), metrics.duration());
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new(Direction::Compress);
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 600;
        metrics.distinct_symbols = 12;

        let text = metrics.export_text();
        assert!(text.contains("direction=compress\n"));
        assert!(text.contains("raw_bytes=1000\n"));
        assert!(text.contains("compressed_bytes=600\n"));
        assert!(text.contains("compression_ratio=0.6000\n"));
        assert!(text.contains("distinct_symbols=12\n"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("compress"), "Compress");
        assert_eq!(capitalize(""), "");
    }
}
