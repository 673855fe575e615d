//! Symbol frequency counting.
//!
//! The first pipeline stage: one pass over the input tallying how often each
//! distinct symbol occurs. Counts are the leaf weights of the Huffman tree.

use std::collections::HashMap;

use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;

/// Occurrence count of every distinct symbol in an input.
///
/// # Invariants
/// - Never empty (construction fails on zero symbols)
/// - Every stored count is >= 1
/// - `total` equals the sum of all counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: HashMap<S, u64>,
    total: u64,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Count symbol occurrences in `input`. O(n) in input length.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyInput` if `input` has no symbols.
    pub fn count(input: &[S]) -> Result<Self> {
        if input.is_empty() {
            return Err(HuffmanError::EmptyInput.into());
        }

        let mut counts = HashMap::new();
        for &symbol in input {
            *counts.entry(symbol).or_insert(0u64) += 1;
        }

        tracing::trace!(
            symbols = input.len(),
            distinct = counts.len(),
            "counted symbol frequencies"
        );

        Ok(Self {
            counts,
            total: input.len() as u64,
        })
    }

    /// Occurrences of `symbol` (0 if absent).
    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate `(symbol, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    /// `(symbol, count)` pairs in ascending symbol order.
    pub fn sorted(&self) -> Vec<(S, u64)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by_key(|&(s, _)| s);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_abracadabra() {
        let input: Vec<char> = "abracadabra".chars().collect();
        let freqs = FrequencyTable::count(&input).unwrap();

        assert_eq!(freqs.get(&'a'), 5);
        assert_eq!(freqs.get(&'b'), 2);
        assert_eq!(freqs.get(&'r'), 2);
        assert_eq!(freqs.get(&'c'), 1);
        assert_eq!(freqs.get(&'d'), 1);
        assert_eq!(freqs.get(&'z'), 0);
        assert_eq!(freqs.distinct(), 5);
        assert_eq!(freqs.total(), 11);
    }

    #[test]
    fn test_empty_input() {
        let result = FrequencyTable::<u8>::count(&[]);
        assert!(matches!(
            result,
            Err(crate::error::Error::Huffman(HuffmanError::EmptyInput))
        ));
    }

    #[test]
    fn test_sorted_order() {
        let freqs = FrequencyTable::count(b"ccbbba").unwrap();
        assert_eq!(freqs.sorted(), vec![(b'a', 1), (b'b', 3), (b'c', 2)]);
    }
}
