//! Bit-level I/O over byte streams.
//!
//! `BitWriter` and `BitReader` wrap any `Write`/`Read` and move bits one
//! byte at a time through a single-byte buffer. Both are MSB-first: the
//! first bit written is the high bit of the first byte.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with zeros on the low end
//! - BitReader: cannot tell padding from data; the decoder stops at the
//!   end-of-stream code instead
//!
//! # Exhaustion
//! The reader keeps one byte of lookahead so `is_exhausted` is exact: it
//! only reports true once every bit of the last byte has been consumed,
//! not as soon as the source returns EOF.
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.put_bits(0b101, 3).unwrap();
//! writer.put_bits(0b11, 2).unwrap();
//! let bytes = writer.finish().unwrap();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&bytes[..]);
//! assert_eq!(reader.get_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.get_bits(2).unwrap(), 0b11);
//! ```

use std::io::{self, Read, Write};

use crate::code::Code;
use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte sink.
///
/// # Invariants
/// - `bit_count` is in `0..8` between calls (a full byte is flushed
///   immediately)
/// - unused low bits of `bit_buffer` are zero
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer
    bit_count: u8,
    /// Complete bytes handed to `inner`
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter with an empty bit buffer over `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bit_buffer: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Write a single bit.
    pub fn put_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.bit_buffer |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.flush_byte()?;
        }
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if count > 64; I/O errors from the sink.
    pub fn put_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            // Fill as much of the current byte as we can in one step
            let room = 8 - self.bit_count as usize;
            let take = remaining.min(room);
            let shift = remaining - take;
            let bits = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.bit_buffer |= bits << (room - take);
            self.bit_count += take as u8;
            remaining -= take;

            if self.bit_count == 8 {
                self.flush_byte()?;
            }
        }

        Ok(())
    }

    /// Write every bit of a Huffman code.
    pub fn put_code(&mut self, code: &Code) -> Result<()> {
        for &bit in code.bits() {
            self.put_bit(bit)?;
        }
        Ok(())
    }

    /// Total bits written so far, including the partial byte.
    pub fn bit_len(&self) -> u64 {
        self.bytes_written * 8 + self.bit_count as u64
    }

    /// Complete bytes handed to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Pad the partial byte with zeros, flush it and the sink, and return
    /// the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            self.flush_byte()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn flush_byte(&mut self) -> Result<()> {
        self.inner.write_all(&[self.bit_buffer])?;
        self.bytes_written += 1;
        self.bit_buffer = 0;
        self.bit_count = 0;
        Ok(())
    }
}

/// Reads bits MSB-first from a byte source.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    /// Last byte pulled from the source
    current: u8,
    /// Next bit of `current` to hand out; 8 means a fresh byte is needed
    cursor: u8,
    /// Byte fetched early by `is_exhausted`
    lookahead: Option<u8>,
    bytes_consumed: u64,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new BitReader positioned at the first bit of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            cursor: 8,
            lookahead: None,
            bytes_consumed: 0,
            bits_read: 0,
        }
    }

    /// Read one bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once every bit of the source is used up.
    pub fn get_bit(&mut self) -> Result<bool> {
        if self.cursor == 8 {
            match self.next_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.cursor = 0;
                }
                None => return Err(BitIoError::UnexpectedEof.into()),
            }
        }

        let bit = (self.current >> (7 - self.cursor)) & 1 == 1;
        self.cursor += 1;
        self.bits_read += 1;
        Ok(bit)
    }

    /// Read `count` bits (at most 64) as an MSB-first integer.
    pub fn get_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | self.get_bit()? as u64;
        }
        Ok(value)
    }

    /// True only when the source is at EOF and no unread bits remain in
    /// the current byte.
    pub fn is_exhausted(&mut self) -> Result<bool> {
        if self.cursor < 8 {
            return Ok(false);
        }
        if self.lookahead.is_none() {
            self.lookahead = self.read_byte()?;
        }
        Ok(self.lookahead.is_none())
    }

    /// Bits handed out so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Bytes pulled from the source for decoding (lookahead excluded).
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    /// Give back the source, dropping any unread bits and lookahead byte.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = match self.lookahead.take() {
            Some(byte) => Some(byte),
            None => self.read_byte()?,
        };
        if byte.is_some() {
            self.bytes_consumed += 1;
        }
        Ok(byte)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
