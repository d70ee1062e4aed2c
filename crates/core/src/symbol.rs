//! Symbol alphabet and frequency model.
//!
//! The alphabet has 257 symbols: the 256 byte values plus an out-of-band
//! end-of-stream sentinel. The sentinel never occurs in the data; it is
//! registered with zero weight when the model is finalized so it always has
//! the lowest merge priority and ends up deepest in the tree.
//!
//! # Ordering
//!
//! The finalized model lists symbols ascending by count. Ties are broken by
//! the order in which bytes were first encountered in the source, and the
//! sentinel always comes first. Bytes that never occur are left out.

use std::fmt;
use std::io::{self, Read};

/// Number of symbols in the alphabet (256 bytes + sentinel).
pub const SYMBOL_COUNT: usize = 257;

/// Read buffer size for the frequency pass.
const READ_CHUNK: usize = 64 * 1024;

/// A symbol of the code alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A literal byte value
    Byte(u8),
    /// The end-of-stream sentinel (index 256)
    EndOfStream,
}

impl Symbol {
    /// Dense index in `0..SYMBOL_COUNT`; the sentinel is 256.
    pub fn index(self) -> usize {
        match self {
            Symbol::Byte(b) => b as usize,
            Symbol::EndOfStream => 256,
        }
    }

    /// Inverse of [`Symbol::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=255 => Some(Symbol::Byte(index as u8)),
            256 => Some(Symbol::EndOfStream),
            _ => None,
        }
    }

    /// True for the end-of-stream sentinel.
    pub fn is_end_of_stream(self) -> bool {
        matches!(self, Symbol::EndOfStream)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Byte(b) => write!(f, "byte {:#04x}", b),
            Symbol::EndOfStream => write!(f, "end-of-stream"),
        }
    }
}

/// A symbol together with its merge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolWeight {
    pub symbol: Symbol,
    pub weight: u64,
}

/// Accumulates byte counts during the frequency pass.
///
/// # Invariants
/// - `first_seen` holds each byte with a non-zero count exactly once, in
///   the order it was first observed
/// - `total` equals the sum of `counts`
#[derive(Debug, Clone)]
pub struct FrequencyCounter {
    counts: [u64; 256],
    first_seen: Vec<u8>,
    total: u64,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            first_seen: Vec::with_capacity(256),
            total: 0,
        }
    }

    /// Count one occurrence of `byte`.
    pub fn observe(&mut self, byte: u8) {
        let slot = &mut self.counts[byte as usize];
        if *slot == 0 {
            self.first_seen.push(byte);
        }
        *slot = slot.saturating_add(1);
        self.total = self.total.saturating_add(1);
    }

    /// Count every byte of `data`, in order.
    pub fn observe_all(&mut self, data: &[u8]) {
        for &byte in data {
            self.observe(byte);
        }
    }

    /// Drain `reader` to EOF, counting every byte.
    ///
    /// # Returns
    /// Number of bytes read.
    pub fn observe_reader<R: Read>(&mut self, mut reader: R) -> io::Result<u64> {
        let mut buf = vec![0u8; READ_CHUNK];
        let mut read_total = 0u64;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.observe_all(&buf[..n]);
            read_total += n as u64;
        }

        Ok(read_total)
    }

    /// Occurrences of `byte` seen so far.
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Total bytes observed.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Register the end-of-stream sentinel and freeze the ordering.
    pub fn finalize(self) -> SymbolModel {
        let mut bytes: Vec<SymbolWeight> = self
            .first_seen
            .iter()
            .map(|&b| SymbolWeight {
                symbol: Symbol::Byte(b),
                weight: self.counts[b as usize],
            })
            .collect();

        // Stable sort keeps encounter order among equal counts.
        bytes.sort_by_key(|sw| sw.weight);

        let mut ordered = Vec::with_capacity(bytes.len() + 1);
        ordered.push(SymbolWeight {
            symbol: Symbol::EndOfStream,
            weight: 0,
        });
        ordered.extend(bytes);

        SymbolModel {
            counts: self.counts,
            total: self.total,
            ordered,
        }
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalized frequency model: the input to the tree builder.
#[derive(Debug, Clone)]
pub struct SymbolModel {
    counts: [u64; 256],
    total: u64,
    ordered: Vec<SymbolWeight>,
}

impl SymbolModel {
    /// Symbols in merge order: sentinel first, then ascending by count.
    pub fn ordered(&self) -> &[SymbolWeight] {
        &self.ordered
    }

    /// Number of symbols in the ordering, sentinel included.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True when no bytes were observed (only the sentinel is present).
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct byte values observed.
    pub fn distinct_bytes(&self) -> usize {
        self.ordered.len() - 1
    }

    /// Total bytes observed.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count for a symbol; the sentinel always reports zero.
    pub fn count(&self, symbol: Symbol) -> u64 {
        match symbol {
            Symbol::Byte(b) => self.counts[b as usize],
            Symbol::EndOfStream => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_index_round_trip() {
        assert_eq!(Symbol::Byte(0).index(), 0);
        assert_eq!(Symbol::Byte(255).index(), 255);
        assert_eq!(Symbol::EndOfStream.index(), 256);

        for i in 0..SYMBOL_COUNT {
            assert_eq!(Symbol::from_index(i).unwrap().index(), i);
        }
        assert_eq!(Symbol::from_index(257), None);
    }

    #[test]
    fn test_observe_counts_and_total() {
        let mut counter = FrequencyCounter::new();
        counter.observe_all(b"AAAB");

        assert_eq!(counter.count(b'A'), 3);
        assert_eq!(counter.count(b'B'), 1);
        assert_eq!(counter.count(b'C'), 0);
        assert_eq!(counter.total(), 4);
    }

    #[test]
    fn test_finalize_puts_sentinel_first() {
        let mut counter = FrequencyCounter::new();
        counter.observe_all(b"AAAB");
        let model = counter.finalize();

        let symbols: Vec<Symbol> = model.ordered().iter().map(|sw| sw.symbol).collect();
        assert_eq!(
            symbols,
            vec![Symbol::EndOfStream, Symbol::Byte(b'B'), Symbol::Byte(b'A')]
        );
        assert_eq!(model.ordered()[0].weight, 0);
        assert_eq!(model.len(), 3);
        assert_eq!(model.distinct_bytes(), 2);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let mut counter = FrequencyCounter::new();
        // z, a, m each appear twice; z seen first
        counter.observe_all(b"zamzam");
        let model = counter.finalize();

        let symbols: Vec<Symbol> = model.ordered().iter().skip(1).map(|sw| sw.symbol).collect();
        assert_eq!(
            symbols,
            vec![Symbol::Byte(b'z'), Symbol::Byte(b'a'), Symbol::Byte(b'm')]
        );
    }

    #[test]
    fn test_empty_input_only_sentinel() {
        let model = FrequencyCounter::new().finalize();

        assert!(model.is_empty());
        assert_eq!(model.len(), 1);
        assert_eq!(model.ordered()[0].symbol, Symbol::EndOfStream);
    }

    #[test]
    fn test_observe_reader() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 7) as u8).collect();
        let mut counter = FrequencyCounter::new();

        let n = counter.observe_reader(&data[..]).unwrap();

        assert_eq!(n, 200_000);
        assert_eq!(counter.total(), 200_000);
        assert_eq!(counter.finalize().distinct_bytes(), 7);
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::Byte(0x41).to_string(), "byte 0x41");
        assert_eq!(Symbol::EndOfStream.to_string(), "end-of-stream");
    }
}
