//! Body transcoding: bytes to codes and back.

use std::io::{self, Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::error::{BitIoError, Error, FormatError, Result};
use crate::symbol::Symbol;
use crate::tree::CodeTree;

const READ_CHUNK: usize = 64 * 1024;

/// Counters from one encoding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Source bytes encoded
    pub symbols: u64,
    /// Bits spent on source bytes (sentinel excluded)
    pub code_bits: u64,
    /// Bits spent on the whole body (sentinel included, padding excluded)
    pub body_bits: u64,
}

/// Encode every byte of `source`, then the end-of-stream code.
///
/// # Errors
/// `FormatError::UnmappedSymbol` if a byte has no code, which happens when
/// the source changed since the table was built.
pub fn encode_body<R: Read, W: Write>(
    mut source: R,
    table: &CodeTable,
    writer: &mut BitWriter<W>,
) -> Result<EncodeSummary> {
    let start = writer.bit_len();
    let mut summary = EncodeSummary::default();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        for &byte in &buf[..n] {
            let symbol = Symbol::Byte(byte);
            let code = table.get(symbol).ok_or_else(|| FormatError::UnmappedSymbol {
                symbol: symbol.to_string(),
            })?;
            writer.put_code(code)?;
            summary.code_bits += code.len() as u64;
        }
        summary.symbols += n as u64;
    }

    let eos = table
        .get(Symbol::EndOfStream)
        .ok_or(FormatError::MissingSentinel)?;
    writer.put_code(eos)?;

    summary.body_bits = writer.bit_len() - start;
    tracing::debug!(
        "encoded {} symbols into {} body bits",
        summary.symbols,
        summary.body_bits
    );
    Ok(summary)
}

/// Decode symbols from `reader` into `sink` until the end-of-stream code.
///
/// Bits after the end-of-stream code are padding and are left unread.
/// Bytes go to `sink` one at a time, so pass a buffered writer for files.
///
/// # Returns
/// Number of bytes written to `sink`.
///
/// # Errors
/// `FormatError::TruncatedBody` if the stream ends before the end-of-stream
/// code is reached.
pub fn decode_body<R: Read, W: Write>(
    reader: &mut BitReader<R>,
    tree: &CodeTree,
    mut sink: W,
) -> Result<u64> {
    if tree.is_leaf() {
        // A lone leaf has a zero-length code and cannot be walked
        return Err(Error::InsufficientSymbols { found: 1 });
    }

    let mut decoded = 0u64;

    loop {
        let mut node = tree;
        let symbol = loop {
            let bit = reader.get_bit().map_err(|e| match e {
                Error::BitIo(BitIoError::UnexpectedEof) => {
                    FormatError::TruncatedBody { decoded }.into()
                }
                other => other,
            })?;

            // The walk starts at an internal node and stops at leaves
            let next = node
                .child(bit)
                .ok_or_else(|| FormatError::IncompleteCodeTable {
                    prefix: String::new(),
                })?;
            match next {
                CodeTree::Leaf { symbol, .. } => break *symbol,
                CodeTree::Internal { .. } => node = next,
            }
        };

        match symbol {
            Symbol::EndOfStream => break,
            Symbol::Byte(b) => {
                sink.write_all(&[b])?;
                decoded += 1;
            }
        }
    }

    sink.flush()?;
    tracing::debug!("decoded {} bytes from {} bits", decoded, reader.bits_read());
    Ok(decoded)
}
