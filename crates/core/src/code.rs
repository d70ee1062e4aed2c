//! Huffman codes and the symbol -> code table.
//!
//! A `CodeTable` is produced by one depth-first walk of the code tree: left
//! edges append `0`, right edges append `1`, and a leaf's code is the path
//! that reached it. Only leaves get codes, which is what makes the table
//! prefix-free.

use std::fmt;

use crate::symbol::{Symbol, SYMBOL_COUNT};
use crate::tree::CodeTree;

/// A variable-length bit string, first bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    /// Create an empty code.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Append one bit (`true` = 1).
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Remove and return the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop()
    }

    /// Bits in transmission order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Code length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl FromIterator<bool> for Code {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One row of the code table, as carried in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub symbol: Symbol,
    pub code: Code,
}

/// Maps each symbol to its assigned code.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
    max_len: usize,
}

impl CodeTable {
    /// Assign codes to every leaf of `tree`.
    pub fn from_tree(tree: &CodeTree) -> Self {
        let mut codes = vec![None; SYMBOL_COUNT];
        let mut max_len = 0;

        // Explicit stack; the tree can be up to 256 levels deep
        let mut stack = vec![(tree, Code::new())];
        while let Some((node, prefix)) = stack.pop() {
            match node {
                CodeTree::Leaf { symbol, .. } => {
                    max_len = max_len.max(prefix.len());
                    codes[symbol.index()] = Some(prefix);
                }
                CodeTree::Internal { left, right, .. } => {
                    let mut right_code = prefix.clone();
                    right_code.push(true);
                    let mut left_code = prefix;
                    left_code.push(false);

                    stack.push((right.as_ref(), right_code));
                    stack.push((left.as_ref(), left_code));
                }
            }
        }

        Self { codes, max_len }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Longest assigned code, in bits.
    pub fn max_code_len(&self) -> usize {
        self.max_len
    }

    /// Assigned entries in header order: the sentinel first, then bytes in
    /// ascending value.
    pub fn entries(&self) -> Vec<CodeEntry> {
        let sentinel = Symbol::EndOfStream;
        std::iter::once(sentinel)
            .chain((0..=255u8).map(Symbol::Byte))
            .filter_map(|symbol| {
                self.get(symbol).map(|code| CodeEntry {
                    symbol,
                    code: code.clone(),
                })
            })
            .collect()
    }

    /// Check that no assigned code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let assigned: Vec<&Code> = self.codes.iter().flatten().collect();
        for (i, a) in assigned.iter().enumerate() {
            for b in &assigned[i + 1..] {
                if a.is_prefix_of(b) || b.is_prefix_of(a) {
                    return false;
                }
            }
        }
        true
    }
}
