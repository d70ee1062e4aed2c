//! huffpack-core: whole-file Huffman compression
//!
//! This library compresses a finite byte source with a static Huffman code:
//! - Counts every byte in one pass, plus a zero-weight end-of-stream sentinel
//! - Builds a code tree with a deterministic tie-break
//! - Writes the code table as a bit-packed header, then re-reads the source
//!   and writes the encoded body in the same bit stream
//! - Decodes by rebuilding the tree from the header alone
//!
//! # Architecture
//!
//! - `symbol`: 257-symbol alphabet and the frequency pass
//! - `tree`: code tree construction and reconstruction
//! - `code`: symbol -> code table
//! - `bitio`: MSB-first bit reading/writing
//! - `header`: code table serialization
//! - `codec`: body encoding and decoding
//! - `file`: stream and file drivers with atomic output
//! - `metrics`: per-run counters and reporting
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use huffpack_core::{compress_stream, decompress_stream};
//!
//! let data = b"abracadabra".to_vec();
//! let mut packed = Vec::new();
//! compress_stream(Cursor::new(&data), &mut packed).unwrap();
//!
//! let mut restored = Vec::new();
//! decompress_stream(&packed[..], &mut restored).unwrap();
//! assert_eq!(restored, data);
//! ```

pub mod bitio;
pub mod code;
pub mod codec;
pub mod error;
pub mod file;
pub mod header;
pub mod metrics;
pub mod symbol;
pub mod tree;

// Re-export commonly used types
pub use code::{Code, CodeEntry, CodeTable};
pub use error::{Error, Result};
pub use file::{
    compress, compress_file, compress_stream, compressed_path, decompress, decompress_file,
    decompress_stream, decompressed_path,
};
pub use metrics::{Direction, Metrics};
pub use symbol::{FrequencyCounter, Symbol, SymbolModel};
pub use tree::CodeTree;
