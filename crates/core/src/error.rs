//! Error types for huffpack.
//!
//! Every fallible operation returns a structured error instead of panicking,
//! so a failed run can be reported cleanly by the caller and never leaves a
//! half-written output behind.

use thiserror::Error;

/// Top-level error type for compression and decompression runs.
///
/// Each variant corresponds to a failure domain:
/// - I/O: opening, reading, writing or persisting files
/// - Format: the compressed stream is not something we can decode
/// - Bit I/O: misuse of the bit reader/writer, or reading past the end
/// - Empty input / insufficient symbols: nothing worth building a code for
#[derive(Debug, Error)]
pub enum Error {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Compressed stream is malformed
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Bit I/O operation failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Source contained no bytes at all
    #[error("input is empty: no codes generated")]
    EmptyInput,

    /// Fewer than two symbols; a Huffman tree needs at least two leaves
    #[error("insufficient symbols: found {found}, need at least 2")]
    InsufficientSymbols { found: usize },
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the last bit of the source
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Compressed-stream format errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// First byte of the stream is not SOH
    #[error("not a valid compressed stream: expected SOH {expected:#04x}, found {found:#04x}")]
    MissingSoh { expected: u8, found: u8 },

    /// Byte following the declared code table is not STX
    #[error("truncated or corrupt header: expected STX {expected:#04x}, found {found:#04x}")]
    MissingStx { expected: u8, found: u8 },

    /// Stream ended inside the header
    #[error("truncated header: stream ended while reading {field}")]
    TruncatedHeader { field: &'static str },

    /// Stream ended before the end-of-stream code was decoded
    #[error("truncated body: stream ended after {decoded} symbols without an end-of-stream code")]
    TruncatedBody { decoded: u64 },

    /// Sentinel entry's 4-bit symbol field is not 0000
    #[error("malformed end-of-stream entry: symbol field {found:#03x}, expected 0x0")]
    MalformedSentinel { found: u8 },

    /// A code cannot be represented by the 8-bit length field
    #[error("code length {length} exceeds maximum {max}")]
    CodeTooLong { length: usize, max: usize },

    /// A header entry declared a zero-length code
    #[error("zero-length code for {symbol}")]
    EmptyCode { symbol: String },

    /// The same symbol appears twice in the code table
    #[error("duplicate code table entry for {symbol}")]
    DuplicateSymbol { symbol: String },

    /// Two codes in the table overlap (equal, or one is a prefix of the other)
    #[error("code {code} for {symbol} conflicts with an earlier entry")]
    ConflictingCode { symbol: String, code: String },

    /// The code set leaves a branch of the tree without a symbol
    #[error("incomplete code table: no symbol assigned under prefix {prefix:?}")]
    IncompleteCodeTable { prefix: String },

    /// The code table has no end-of-stream entry
    #[error("code table has no end-of-stream entry")]
    MissingSentinel,

    /// A byte read during encoding has no code (source changed between passes)
    #[error("no code assigned to {symbol}; source changed between passes?")]
    UnmappedSymbol { symbol: String },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_converts() {
        let err: Error = FormatError::MissingSoh {
            expected: 0x01,
            found: 0x7f,
        }
        .into();
        assert!(matches!(err, Error::Format(FormatError::MissingSoh { found: 0x7f, .. })));
        assert!(err.to_string().contains("not a valid compressed stream"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_insufficient_symbols_message() {
        let err = Error::InsufficientSymbols { found: 1 };
        assert_eq!(err.to_string(), "insufficient symbols: found 1, need at least 2");
    }
}
