//! Huffman code tree: construction from weights and reconstruction from a
//! code table.
//!
//! # Construction
//!
//! All candidates live in one min-heap keyed by `(weight, kind, seq)`:
//! - lower weight first
//! - on equal weight an unmerged leaf beats a merged subtree
//! - leaves then follow the model's order, subtrees their creation order
//!
//! The two lowest items are popped and merged, the first popped becoming the
//! left child. The key is a total order, so the result is deterministic.
//!
//! # Reconstruction
//!
//! The decoder never sees weights. It starts from an empty root and, for each
//! header entry, follows the code bit by bit, creating placeholder branches
//! for missing prefixes, then hangs a leaf on the final bit. A well-formed
//! table yields a tree isomorphic to the encoder's.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::code::{Code, CodeEntry};
use crate::error::{Error, FormatError, Result};
use crate::symbol::{Symbol, SymbolModel, SymbolWeight};

/// An owned, strictly binary code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeTree {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<CodeTree>,
        right: Box<CodeTree>,
    },
}

impl CodeTree {
    /// Build the tree for a finalized symbol model.
    pub fn build(model: &SymbolModel) -> Result<Self> {
        Self::from_weights(model.ordered())
    }

    /// Build the tree from symbols listed in merge order.
    ///
    /// # Errors
    /// `Error::InsufficientSymbols` if fewer than two symbols are given.
    pub fn from_weights(symbols: &[SymbolWeight]) -> Result<Self> {
        if symbols.len() < 2 {
            return Err(Error::InsufficientSymbols {
                found: symbols.len(),
            });
        }

        let mut heap: BinaryHeap<Candidate> = symbols
            .iter()
            .enumerate()
            .map(|(seq, sw)| Candidate {
                weight: sw.weight,
                kind: Kind::Leaf,
                seq,
                node: CodeTree::Leaf {
                    symbol: sw.symbol,
                    weight: sw.weight,
                },
            })
            .collect();

        let mut merged = 0usize;
        while heap.len() > 1 {
            let (Some(first), Some(second)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let weight = first.weight.saturating_add(second.weight);
            heap.push(Candidate {
                weight,
                kind: Kind::Merged,
                seq: merged,
                node: CodeTree::Internal {
                    weight,
                    left: Box::new(first.node),
                    right: Box::new(second.node),
                },
            });
            merged += 1;
        }

        let root = heap
            .pop()
            .map(|c| c.node)
            .ok_or(Error::InsufficientSymbols { found: 0 })?;

        tracing::debug!(
            "built code tree: {} leaves, {} merges, depth {}",
            symbols.len(),
            merged,
            root.depth()
        );
        Ok(root)
    }

    /// Rebuild a tree from header entries.
    ///
    /// # Errors
    /// - `FormatError::EmptyCode` for a zero-length code
    /// - `FormatError::ConflictingCode` if a code collides with or is a
    ///   prefix of another
    /// - `FormatError::IncompleteCodeTable` if some branch has no symbol
    pub fn from_codes(entries: &[CodeEntry]) -> Result<Self> {
        let mut root = Slot::Vacant;

        for entry in entries {
            if entry.code.is_empty() {
                return Err(FormatError::EmptyCode {
                    symbol: entry.symbol.to_string(),
                }
                .into());
            }
            root.insert(entry)?;
        }

        root.into_tree(&mut Code::new())
    }

    /// Combined count of every leaf below this node (0 for rebuilt trees).
    pub fn weight(&self) -> u64 {
        match self {
            CodeTree::Leaf { weight, .. } => *weight,
            CodeTree::Internal { weight, .. } => *weight,
        }
    }

    /// True for a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, CodeTree::Leaf { .. })
    }

    /// Child reached by `bit` (`false` = left); `None` on a leaf.
    pub fn child(&self, bit: bool) -> Option<&CodeTree> {
        match self {
            CodeTree::Leaf { .. } => None,
            CodeTree::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    /// Number of symbols in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            CodeTree::Leaf { .. } => 1,
            CodeTree::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            CodeTree::Leaf { .. } => 0,
            CodeTree::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Leaf,
    Merged,
}

/// A heap entry: a leaf or merged subtree waiting to be combined.
#[derive(Debug)]
struct Candidate {
    weight: u64,
    kind: Kind,
    seq: usize,
    node: CodeTree,
}

impl Candidate {
    fn key(&self) -> (u64, Kind, usize) {
        (self.weight, self.kind, self.seq)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (smallest key = highest priority)
        other.key().cmp(&self.key())
    }
}

/// Partially rebuilt tree used while reading the header.
#[derive(Debug)]
enum Slot {
    Vacant,
    Leaf(Symbol),
    Branch(Box<Slot>, Box<Slot>),
}

impl Slot {
    fn insert(&mut self, entry: &CodeEntry) -> Result<()> {
        let conflict = || -> Error {
            FormatError::ConflictingCode {
                symbol: entry.symbol.to_string(),
                code: entry.code.to_string(),
            }
            .into()
        };

        let mut node = self;
        for &bit in entry.code.bits() {
            if matches!(*node, Slot::Vacant) {
                *node = Slot::Branch(Box::new(Slot::Vacant), Box::new(Slot::Vacant));
            }
            node = match node {
                Slot::Branch(left, right) => {
                    if bit {
                        right.as_mut()
                    } else {
                        left.as_mut()
                    }
                }
                // An existing leaf is a prefix of this code
                _ => return Err(conflict()),
            };
        }

        // Occupied: duplicate code, or this code is a prefix of an earlier one
        if !matches!(node, Slot::Vacant) {
            return Err(conflict());
        }
        *node = Slot::Leaf(entry.symbol);
        Ok(())
    }

    fn into_tree(self, prefix: &mut Code) -> Result<CodeTree> {
        match self {
            Slot::Vacant => Err(FormatError::IncompleteCodeTable {
                prefix: prefix.to_string(),
            }
            .into()),
            Slot::Leaf(symbol) => Ok(CodeTree::Leaf { symbol, weight: 0 }),
            Slot::Branch(left, right) => {
                prefix.push(false);
                let left = left.into_tree(prefix)?;
                prefix.pop();

                prefix.push(true);
                let right = right.into_tree(prefix)?;
                prefix.pop();

                Ok(CodeTree::Internal {
                    weight: 0,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeTable;
    use crate::symbol::FrequencyCounter;

    fn model(data: &[u8]) -> SymbolModel {
        let mut counter = FrequencyCounter::new();
        counter.observe_all(data);
        counter.finalize()
    }

    fn code(s: &str) -> Code {
        s.chars().map(|c| c == '1').collect()
    }

    fn entry(symbol: Symbol, bits: &str) -> CodeEntry {
        CodeEntry {
            symbol,
            code: code(bits),
        }
    }

    #[test]
    fn test_aaab_tree_shape() {
        let tree = CodeTree::build(&model(b"AAAB")).unwrap();

        // Sentinel and B merge first (weights 0 and 1), then join A (3)
        match &tree {
            CodeTree::Internal { weight, left, right } => {
                assert_eq!(*weight, 4);
                assert_eq!(left.weight(), 1);
                assert_eq!(
                    **right,
                    CodeTree::Leaf {
                        symbol: Symbol::Byte(b'A'),
                        weight: 3
                    }
                );
                assert_eq!(left.leaf_count(), 2);
            }
            CodeTree::Leaf { .. } => panic!("expected an internal root"),
        }

        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.get(Symbol::Byte(b'A')).unwrap().len(), 1);
        let eos = table.get(Symbol::EndOfStream).unwrap();
        let b = table.get(Symbol::Byte(b'B')).unwrap();
        assert_eq!(eos.len(), 2);
        assert_eq!(b.len(), 2);
        assert_eq!(eos.bits()[0], b.bits()[0]);
        assert_ne!(eos.bits()[1], b.bits()[1]);
    }

    #[test]
    fn test_first_popped_goes_left() {
        let tree = CodeTree::build(&model(b"AAAB")).unwrap();
        let table = CodeTable::from_tree(&tree);

        assert_eq!(table.get(Symbol::EndOfStream), Some(&code("00")));
        assert_eq!(table.get(Symbol::Byte(b'B')), Some(&code("01")));
        assert_eq!(table.get(Symbol::Byte(b'A')), Some(&code("1")));
    }

    #[test]
    fn test_two_symbols_get_one_bit_codes() {
        let tree = CodeTree::build(&model(b"xxxx")).unwrap();
        let table = CodeTable::from_tree(&tree);

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(table.get(Symbol::EndOfStream), Some(&code("0")));
        assert_eq!(table.get(Symbol::Byte(b'x')), Some(&code("1")));
    }

    #[test]
    fn test_insufficient_symbols() {
        let result = CodeTree::build(&model(b""));
        assert!(matches!(result, Err(Error::InsufficientSymbols { found: 1 })));

        let result = CodeTree::from_weights(&[]);
        assert!(matches!(result, Err(Error::InsufficientSymbols { found: 0 })));
    }

    #[test]
    fn test_leaf_wins_weight_tie() {
        // EOS(0)+a(1) -> merged(1); tie between merged(1) and b(1): b first
        let weights = [
            SymbolWeight { symbol: Symbol::EndOfStream, weight: 0 },
            SymbolWeight { symbol: Symbol::Byte(b'a'), weight: 1 },
            SymbolWeight { symbol: Symbol::Byte(b'b'), weight: 1 },
        ];
        let tree = CodeTree::from_weights(&weights).unwrap();
        let table = CodeTable::from_tree(&tree);

        assert_eq!(table.get(Symbol::Byte(b'b')), Some(&code("0")));
        assert_eq!(table.get(Symbol::EndOfStream), Some(&code("10")));
        assert_eq!(table.get(Symbol::Byte(b'a')), Some(&code("11")));
    }

    #[test]
    fn test_weights_sum_to_total() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = CodeTree::build(&model(data)).unwrap();
        assert_eq!(tree.weight(), data.len() as u64);
    }

    #[test]
    fn test_deterministic() {
        let data = b"abracadabra, abracadabra!";
        let a = CodeTree::build(&model(data)).unwrap();
        let b = CodeTree::build(&model(data)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_codes_rebuilds_shape() {
        let entries = vec![
            entry(Symbol::EndOfStream, "00"),
            entry(Symbol::Byte(b'A'), "1"),
            entry(Symbol::Byte(b'B'), "01"),
        ];
        let tree = CodeTree::from_codes(&entries).unwrap();

        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
        let left = tree.child(false).unwrap();
        assert_eq!(
            left.child(true),
            Some(&CodeTree::Leaf {
                symbol: Symbol::Byte(b'B'),
                weight: 0
            })
        );
    }

    #[test]
    fn test_from_codes_matches_encoder_table() {
        let tree = CodeTree::build(&model(b"mississippi river banks")).unwrap();
        let table = CodeTable::from_tree(&tree);

        let rebuilt = CodeTree::from_codes(&table.entries()).unwrap();
        let rebuilt_table = CodeTable::from_tree(&rebuilt);

        assert_eq!(table.entries(), rebuilt_table.entries());
    }

    #[test]
    fn test_from_codes_rejects_prefix_conflict() {
        let entries = vec![
            entry(Symbol::EndOfStream, "0"),
            entry(Symbol::Byte(1), "01"),
        ];
        assert!(matches!(
            CodeTree::from_codes(&entries),
            Err(Error::Format(FormatError::ConflictingCode { .. }))
        ));

        let entries = vec![
            entry(Symbol::EndOfStream, "01"),
            entry(Symbol::Byte(1), "0"),
        ];
        assert!(matches!(
            CodeTree::from_codes(&entries),
            Err(Error::Format(FormatError::ConflictingCode { .. }))
        ));
    }

    #[test]
    fn test_from_codes_rejects_duplicate_code() {
        let entries = vec![
            entry(Symbol::EndOfStream, "1"),
            entry(Symbol::Byte(1), "1"),
        ];
        assert!(matches!(
            CodeTree::from_codes(&entries),
            Err(Error::Format(FormatError::ConflictingCode { .. }))
        ));
    }

    #[test]
    fn test_from_codes_rejects_incomplete_table() {
        let entries = vec![
            entry(Symbol::EndOfStream, "00"),
            entry(Symbol::Byte(7), "1"),
        ];
        match CodeTree::from_codes(&entries) {
            Err(Error::Format(FormatError::IncompleteCodeTable { prefix })) => {
                assert_eq!(prefix, "01");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_from_codes_rejects_empty_code() {
        let entries = vec![entry(Symbol::EndOfStream, "")];
        assert!(matches!(
            CodeTree::from_codes(&entries),
            Err(Error::Format(FormatError::EmptyCode { .. }))
        ));
    }
}
