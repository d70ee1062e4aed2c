//! Code table header serialization and parsing.
//!
//! The header ships the code table so the decoder can rebuild the tree
//! without any frequency information. It is written into the same bit
//! stream as the body; nothing is byte-aligned except the first field.
//!
//! # Header Format
//!
//! ```text
//! +----------------------+
//! | SOH (8 bits)         |  0x01
//! +----------------------+
//! | count (8 bits)       |  number of entries - 2
//! +----------------------+
//! | sentinel entry       |  symbol: 4 bits, always 0000
//! |                      |  length: 8 bits
//! |                      |  code:   `length` bits
//! +----------------------+
//! | byte entries         |  symbol: 8 bits
//! | (count + 1 times)    |  length: 8 bits
//! |                      |  code:   `length` bits
//! +----------------------+
//! | STX (8 bits)         |  0x02
//! +----------------------+
//! ```
//!
//! The sentinel entry always comes first and uses a 4-bit symbol field.
//! Byte entries follow in ascending byte order. With 2..=257 entries the
//! stored count always fits in one byte.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::code::{Code, CodeEntry, CodeTable};
use crate::error::{BitIoError, Error, FormatError, Result};
use crate::symbol::Symbol;

/// Start-of-header marker.
pub const SOH: u8 = 0x01;

/// End-of-header marker.
pub const STX: u8 = 0x02;

/// Longest code the 8-bit length field can describe.
pub const MAX_CODE_LEN: usize = 255;

/// Width of the sentinel entry's symbol field.
const SENTINEL_FIELD_BITS: usize = 4;

/// Fewest entries a valid table can have (sentinel plus one byte).
const MIN_ENTRIES: usize = 2;

/// Write the header for `table`.
///
/// The table is validated before anything is written, so a rejected table
/// leaves the writer untouched.
///
/// # Returns
/// Number of header bits written.
pub fn write_header<W: Write>(table: &CodeTable, writer: &mut BitWriter<W>) -> Result<u64> {
    let entries = table.entries();
    validate(&entries)?;

    let start = writer.bit_len();

    writer.put_bits(SOH as u64, 8)?;
    writer.put_bits((entries.len() - MIN_ENTRIES) as u64, 8)?;

    for entry in &entries {
        match entry.symbol {
            Symbol::EndOfStream => writer.put_bits(0, SENTINEL_FIELD_BITS)?,
            Symbol::Byte(b) => writer.put_bits(b as u64, 8)?,
        }
        writer.put_bits(entry.code.len() as u64, 8)?;
        writer.put_code(&entry.code)?;
    }

    writer.put_bits(STX as u64, 8)?;

    let bits = writer.bit_len() - start;
    tracing::debug!("wrote header: {} entries, {} bits", entries.len(), bits);
    Ok(bits)
}

/// Read a header and return its entries in stream order.
///
/// Only the framing and field values are checked here. Whether the codes
/// form a complete prefix-free set is checked when the tree is rebuilt.
///
/// # Errors
/// - `FormatError::MissingSoh` / `FormatError::MissingStx` for bad markers
/// - `FormatError::TruncatedHeader` if the stream ends inside the header
/// - `FormatError::MalformedSentinel` if the sentinel field is not 0000
/// - `FormatError::DuplicateSymbol` if a byte appears twice
pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<Vec<CodeEntry>> {
    let soh = read_field(reader, 8, "SOH marker")? as u8;
    if soh != SOH {
        return Err(FormatError::MissingSoh {
            expected: SOH,
            found: soh,
        }
        .into());
    }

    let count = read_field(reader, 8, "code count")? as usize + MIN_ENTRIES;
    let mut entries = Vec::with_capacity(count);
    let mut seen = [false; 256];

    for i in 0..count {
        let symbol = if i == 0 {
            let field = read_field(reader, SENTINEL_FIELD_BITS, "sentinel symbol")? as u8;
            if field != 0 {
                return Err(FormatError::MalformedSentinel { found: field }.into());
            }
            Symbol::EndOfStream
        } else {
            let byte = read_field(reader, 8, "symbol")? as u8;
            if std::mem::replace(&mut seen[byte as usize], true) {
                return Err(FormatError::DuplicateSymbol {
                    symbol: Symbol::Byte(byte).to_string(),
                }
                .into());
            }
            Symbol::Byte(byte)
        };

        let length = read_field(reader, 8, "code length")? as usize;
        let mut code = Code::new();
        for _ in 0..length {
            code.push(read_field(reader, 1, "code bits")? == 1);
        }

        entries.push(CodeEntry { symbol, code });
    }

    let stx = read_field(reader, 8, "STX marker")? as u8;
    if stx != STX {
        return Err(FormatError::MissingStx {
            expected: STX,
            found: stx,
        }
        .into());
    }

    tracing::debug!(
        "read header: {} entries, {} bits",
        entries.len(),
        reader.bits_read()
    );
    Ok(entries)
}

fn validate(entries: &[CodeEntry]) -> Result<()> {
    if entries.len() < MIN_ENTRIES {
        return Err(Error::InsufficientSymbols {
            found: entries.len(),
        });
    }
    if !entries[0].symbol.is_end_of_stream() {
        return Err(FormatError::MissingSentinel.into());
    }

    for entry in entries {
        if entry.code.is_empty() {
            return Err(FormatError::EmptyCode {
                symbol: entry.symbol.to_string(),
            }
            .into());
        }
        if entry.code.len() > MAX_CODE_LEN {
            return Err(FormatError::CodeTooLong {
                length: entry.code.len(),
                max: MAX_CODE_LEN,
            }
            .into());
        }
    }
    Ok(())
}

/// Read a fixed-width field, reporting EOF as a truncated header.
fn read_field<R: Read>(reader: &mut BitReader<R>, bits: usize, field: &'static str) -> Result<u64> {
    reader.get_bits(bits).map_err(|e| match e {
        Error::BitIo(BitIoError::UnexpectedEof) => FormatError::TruncatedHeader { field }.into(),
        other => other,
    })
}
