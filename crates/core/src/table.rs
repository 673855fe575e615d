//! Code tables: the symbol → code mapping derived from a Huffman tree.
//!
//! A depth-first walk of the finished tree assigns `0` to each left branch
//! and `1` to each right branch; a leaf's code is the path from the root.
//! The one-leaf tree gets the code `0`, since an empty code could never be
//! told apart from "no bits" while decoding.
//!
//! # Metadata Format
//!
//! Tables serialize as a self-describing byte string so they can travel
//! alongside the payload:
//!
//! ```text
//! +--------------------+
//! | kind (1)           |  symbol kind tag (see `symbol`)
//! +--------------------+
//! | entry_count (4)    |  u32 little-endian
//! +--------------------+
//! | entries            |  ascending symbol order, each:
//! |   symbol (w)       |    w = kind width
//! |   code_len (1)     |    1..=64
//! |   code (ceil(l/8)) |    MSB-first, zero padded
//! +--------------------+
//! ```
//!
//! Entries are sorted, so two tables with the same codes serialize to the
//! same bytes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, FramingError, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::{Symbol, SymbolKind};
use crate::tree::{HuffmanTree, Node};

/// Longest code a [`Code`] can hold.
pub const MAX_CODE_LEN: usize = 64;

/// A non-empty bit string of at most [`MAX_CODE_LEN`] bits.
///
/// Bits are packed into the low `len` bits of `bits`, first bit most
/// significant.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    /// Build a code from its low `len` bits.
    ///
    /// Returns `None` if `len` is 0 or exceeds [`MAX_CODE_LEN`].
    pub fn new(bits: u64, len: usize) -> Option<Self> {
        if len == 0 || len > MAX_CODE_LEN {
            return None;
        }
        let mask = if len == 64 { u64::MAX } else { (1u64 << len) - 1 };
        Some(Self {
            bits: bits & mask,
            len: len as u8,
        })
    }

    /// Packed bit value (first bit most significant).
    pub fn bits(&self) -> u64 {
        self.bits
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// The `i`-th bit, counting from the first (root-side) bit.
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        (self.bits >> (self.len() - 1 - i)) & 1 == 1
    }

    /// Whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    /// Append one bit, for walking one level deeper into the tree.
    fn child(path: Option<Code>, bit: bool) -> Result<Code> {
        let (bits, len) = path.map_or((0, 0), |c| (c.bits, c.len()));
        if len >= MAX_CODE_LEN {
            return Err(HuffmanError::CodeLengthTooLong {
                length: len + 1,
                max: MAX_CODE_LEN,
            }
            .into());
        }
        Ok(Code {
            bits: (bits << 1) | bit as u64,
            len: len as u8 + 1,
        })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

impl FromStr for Code {
    type Err = Error;

    /// Parse a string of `0`/`1` characters.
    fn from_str(s: &str) -> Result<Self> {
        let mut code: Option<Code> = None;
        for ch in s.chars() {
            let bit = match ch {
                '0' => false,
                '1' => true,
                other => {
                    return Err(HuffmanError::InvalidTable(format!(
                        "invalid bit character {:?} in code {:?}",
                        other, s
                    ))
                    .into())
                }
            };
            code = Some(Code::child(code, bit)?);
        }
        code.ok_or_else(|| HuffmanError::InvalidTable("empty code".to_string()).into())
    }
}

/// Mapping from symbol to its prefix-free code. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S: Symbol> {
    codes: HashMap<S, Code>,
}

impl<S: Symbol> CodeTable<S> {
    /// Count, build the tree, and derive the table for `input`.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyInput` if `input` has no symbols.
    pub fn build(input: &[S]) -> Result<Self> {
        Self::from_tree(&HuffmanTree::from_input(input)?)
    }

    /// Derive the table for a frequency distribution.
    pub fn from_frequencies(freqs: &FrequencyTable<S>) -> Result<Self> {
        Self::from_tree(&HuffmanTree::build(freqs)?)
    }

    /// Walk the tree and record each leaf's path. O(u).
    ///
    /// # Errors
    /// Returns `HuffmanError::CodeLengthTooLong` if some leaf sits deeper
    /// than [`MAX_CODE_LEN`].
    pub fn from_tree(tree: &HuffmanTree<S>) -> Result<Self> {
        let mut codes = HashMap::new();

        match tree.root() {
            Node::Leaf { symbol, .. } => {
                codes.insert(*symbol, Code::child(None, false)?);
            }
            root => assign_codes(root, None, &mut codes)?,
        }

        let table = Self { codes };
        tracing::debug!(
            entries = table.len(),
            max_code_len = table.max_code_len(),
            "generated code table"
        );
        Ok(table)
    }

    /// Build a table from explicit codes.
    ///
    /// # Errors
    /// Returns `HuffmanError::InvalidTable` if there are no entries, a symbol
    /// repeats, or one code is a prefix of another.
    pub fn from_codes<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Code)>,
    {
        let mut codes = HashMap::new();
        for (symbol, code) in entries {
            if codes.insert(symbol, code).is_some() {
                return Err(HuffmanError::InvalidTable(format!(
                    "duplicate symbol {}",
                    symbol.label()
                ))
                .into());
            }
        }
        if codes.is_empty() {
            return Err(HuffmanError::InvalidTable("no entries".to_string()).into());
        }

        let table = Self { codes };
        if let Some((a, b)) = table.prefix_violation() {
            return Err(HuffmanError::InvalidTable(format!(
                "code {} is a prefix of code {}",
                a, b
            ))
            .into());
        }
        Ok(table)
    }

    /// Code for `symbol`, if present. O(1).
    pub fn get(&self, symbol: &S) -> Option<Code> {
        self.codes.get(symbol).copied()
    }

    /// Number of entries (never 0).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, Code)> + '_ {
        self.codes.iter().map(|(&s, &c)| (s, c))
    }

    /// Entries in ascending symbol order.
    pub fn sorted(&self) -> Vec<(S, Code)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|&(s, _)| s);
        entries
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Σ frequency(sym) × len(code(sym)): the encoded size in bits.
    ///
    /// Symbols missing from the table contribute nothing.
    pub fn weighted_length(&self, freqs: &FrequencyTable<S>) -> u64 {
        freqs
            .iter()
            .filter_map(|(s, count)| self.get(&s).map(|c| count * c.len() as u64))
            .sum()
    }

    /// Whether no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }

    /// Find one pair `(a, b)` where `a` is a prefix of `b`.
    ///
    /// In lexicographic order a prefix always sorts directly before some
    /// extension of it, so comparing neighbours is sufficient.
    fn prefix_violation(&self) -> Option<(Code, Code)> {
        let mut codes: Vec<(String, Code)> =
            self.codes.values().map(|c| (c.to_string(), *c)).collect();
        codes.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        codes
            .windows(2)
            .find(|pair| pair[0].1.is_prefix_of(&pair[1].1))
            .map(|pair| (pair[0].1, pair[1].1))
    }

    /// Serialize the table (see module docs for the layout).
    pub fn serialize_metadata(&self) -> Vec<u8> {
        let width = S::KIND.width();
        let mut out = Vec::with_capacity(5 + self.len() * (width + 2));

        out.push(S::KIND.tag());
        out.extend_from_slice(&(self.len() as u32).to_le_bytes());

        for (symbol, code) in self.sorted() {
            symbol.write_bytes(&mut out);
            out.push(code.len);
            let n = code_bytes(code.len());
            let aligned = (code.bits as u128) << (n * 8 - code.len());
            out.extend_from_slice(&aligned.to_be_bytes()[16 - n..]);
        }

        out
    }

    /// Parse a table written by [`serialize_metadata`](Self::serialize_metadata).
    ///
    /// # Errors
    /// - `FramingError::SymbolKindMismatch` if written for another alphabet
    /// - `HuffmanError::InvalidTable` if truncated, malformed, or not prefix-free
    pub fn deserialize_metadata(bytes: &[u8]) -> Result<Self> {
        let truncated = || Error::from(HuffmanError::InvalidTable("truncated metadata".to_string()));

        let (&tag, rest) = bytes.split_first().ok_or_else(truncated)?;
        let kind = SymbolKind::from_tag(tag)?;
        if kind != S::KIND {
            return Err(FramingError::SymbolKindMismatch {
                expected: S::KIND.name(),
                actual: kind.name(),
            }
            .into());
        }

        let count_bytes: [u8; 4] = rest
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(truncated)?;
        let count = u32::from_le_bytes(count_bytes) as usize;

        let width = kind.width();
        let mut pos = 5;
        let mut entries = Vec::with_capacity(count.min(bytes.len()));

        for _ in 0..count {
            let symbol_bytes = bytes.get(pos..pos + width).ok_or_else(truncated)?;
            let symbol = S::read_bytes(symbol_bytes).ok_or_else(|| {
                HuffmanError::InvalidTable(format!("invalid symbol bytes {:02x?}", symbol_bytes))
            })?;
            pos += width;

            let len = *bytes.get(pos).ok_or_else(truncated)? as usize;
            pos += 1;
            if len == 0 || len > MAX_CODE_LEN {
                return Err(HuffmanError::InvalidTable(format!(
                    "code length {} for symbol {} out of range",
                    len,
                    symbol.label()
                ))
                .into());
            }

            let n = code_bytes(len);
            let raw = bytes.get(pos..pos + n).ok_or_else(truncated)?;
            pos += n;
            let aligned = raw.iter().fold(0u128, |acc, &b| (acc << 8) | b as u128);
            let bits = (aligned >> (n * 8 - len)) as u64;

            // len is range-checked above
            if let Some(code) = Code::new(bits, len) {
                entries.push((symbol, code));
            }
        }

        if pos != bytes.len() {
            return Err(HuffmanError::InvalidTable(format!(
                "{} trailing bytes after {} entries",
                bytes.len() - pos,
                count
            ))
            .into());
        }

        Self::from_codes(entries)
    }
}

impl<S: Symbol> fmt::Display for CodeTable<S> {
    /// One `symbol : code` line per entry, ascending symbol order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.sorted() {
            writeln!(f, "{} : {}", symbol.label(), code)?;
        }
        Ok(())
    }
}

/// Bytes needed to hold a code of `len` bits.
fn code_bytes(len: usize) -> usize {
    len.div_ceil(8)
}

/// Depth-first walk: left appends `0`, right appends `1`.
fn assign_codes<S: Symbol>(
    node: &Node<S>,
    path: Option<Code>,
    codes: &mut HashMap<S, Code>,
) -> Result<()> {
    match node {
        Node::Leaf { symbol, .. } => {
            // Only the root can lack a path, and a leaf root is handled by the caller
            if let Some(code) = path {
                codes.insert(*symbol, code);
            }
        }
        Node::Internal { left, right, .. } => {
            assign_codes(left, Some(Code::child(path, false)?), codes)?;
            assign_codes(right, Some(Code::child(path, true)?), codes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn test_code_display_keeps_leading_zeros() {
        let c = Code::new(0b001, 3).unwrap();
        assert_eq!(c.to_string(), "001");
        assert_eq!(code("001"), c);
    }

    #[test]
    fn test_code_rejects_bad_lengths() {
        assert!(Code::new(0, 0).is_none());
        assert!(Code::new(0, 65).is_none());
        assert_eq!(Code::new(u64::MAX, 64).unwrap().len(), 64);
        assert!("".parse::<Code>().is_err());
        assert!("012".parse::<Code>().is_err());
    }

    #[test]
    fn test_is_prefix_of() {
        assert!(code("10").is_prefix_of(&code("101")));
        assert!(code("10").is_prefix_of(&code("10")));
        assert!(!code("11").is_prefix_of(&code("101")));
        assert!(!code("101").is_prefix_of(&code("10")));
    }

    #[test]
    fn test_abracadabra_codes() {
        // a:5 b:2 r:2 c:1 d:1
        // merges: c+d=2, b+cd=4 (b < c), r+bcd=6, a+rbcd=11
        let table = CodeTable::build(&chars("abracadabra")).unwrap();

        assert_eq!(table.get(&'a'), Some(code("0")));
        assert_eq!(table.get(&'r'), Some(code("10")));
        assert_eq!(table.get(&'b'), Some(code("110")));
        assert_eq!(table.get(&'c'), Some(code("1110")));
        assert_eq!(table.get(&'d'), Some(code("1111")));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_optimal_weighted_length() {
        let input = chars("abracadabra");
        let freqs = FrequencyTable::count(&input).unwrap();
        let table = CodeTable::from_frequencies(&freqs).unwrap();
        // Hand-computed minimum: 5*1 + 2*2 + 2*3 + 1*4 + 1*4
        assert_eq!(table.weighted_length(&freqs), 23);
    }

    #[test]
    fn test_single_symbol_gets_zero() {
        let table = CodeTable::build(&chars("aaaa")).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&'a'), Some(code("0")));
    }

    #[test]
    fn test_empty_input() {
        let result = CodeTable::<char>::build(&[]);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::EmptyInput))
        ));
    }

    #[test]
    fn test_tied_frequencies_identical_tables() {
        let first = CodeTable::build(&chars("aabb")).unwrap();
        let second = CodeTable::build(&chars("aabb")).unwrap();

        assert_eq!(first.get(&'a'), Some(code("0")));
        assert_eq!(first.get(&'b'), Some(code("1")));
        assert_eq!(first.serialize_metadata(), second.serialize_metadata());
    }

    #[test]
    fn test_from_codes_rejects_prefix() {
        let result = CodeTable::from_codes([('a', code("1")), ('b', code("10"))]);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::InvalidTable(_)))
        ));
    }

    #[test]
    fn test_from_codes_rejects_duplicate_and_empty() {
        assert!(CodeTable::from_codes([('a', code("0")), ('a', code("1"))]).is_err());
        assert!(CodeTable::<u8>::from_codes(Vec::new()).is_err());
    }

    #[test]
    fn test_metadata_round_trip() {
        let table = CodeTable::build(b"this is an example of a huffman tree").unwrap();
        let bytes = table.serialize_metadata();
        let parsed = CodeTable::<u8>::deserialize_metadata(&bytes).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_metadata_layout() {
        let table = CodeTable::build(b"aab").unwrap();
        // a:2 b:1 -> b merges first as left child
        assert_eq!(
            table.serialize_metadata(),
            vec![
                0, // byte kind
                2, 0, 0, 0, // two entries
                b'a', 1, 0b1000_0000, // a = "1"
                b'b', 1, 0b0000_0000, // b = "0"
            ]
        );
    }

    #[test]
    fn test_metadata_kind_mismatch() {
        let bytes = CodeTable::build(b"abc").unwrap().serialize_metadata();
        let result = CodeTable::<char>::deserialize_metadata(&bytes);
        assert!(matches!(
            result,
            Err(Error::Framing(FramingError::SymbolKindMismatch { .. }))
        ));
    }

    #[test]
    fn test_metadata_truncated() {
        let bytes = CodeTable::build(b"abcabd").unwrap().serialize_metadata();
        for cut in 0..bytes.len() {
            assert!(CodeTable::<u8>::deserialize_metadata(&bytes[..cut]).is_err());
        }
    }

    fn aab_metadata() -> Vec<u8> {
        CodeTable::build(b"aab").unwrap().serialize_metadata()
    }

    fn invalid_table_reason(bytes: &[u8]) -> String {
        match CodeTable::<u8>::deserialize_metadata(bytes) {
            Err(Error::Huffman(HuffmanError::InvalidTable(reason))) => reason,
            other => panic!("expected InvalidTable, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_zero_code_length() {
        let mut bytes = aab_metadata();
        bytes[6] = 0; // length byte of 'a'
        assert!(invalid_table_reason(&bytes).contains("code length 0"));
    }

    #[test]
    fn test_metadata_code_length_over_max() {
        let mut bytes = aab_metadata();
        bytes[6] = 65;
        assert!(invalid_table_reason(&bytes).contains("code length 65"));
    }

    #[test]
    fn test_metadata_trailing_bytes() {
        let mut bytes = aab_metadata();
        bytes.push(0);
        assert!(invalid_table_reason(&bytes).contains("1 trailing bytes"));
    }

    #[test]
    fn test_metadata_duplicate_symbol() {
        let mut bytes = aab_metadata();
        bytes[8] = b'a'; // 'b' entry now claims 'a' as well
        assert!(invalid_table_reason(&bytes).contains("duplicate symbol"));
    }

    #[test]
    fn test_metadata_prefix_collision() {
        let mut bytes = aab_metadata();
        bytes[7] = 0b0000_0000; // 'a' becomes "0", same as 'b'
        assert!(invalid_table_reason(&bytes).contains("prefix"));
    }

    #[test]
    fn test_parse_code_too_long() {
        assert_eq!(code(&"1".repeat(64)).len(), 64);
        assert!(matches!(
            "0".repeat(65).parse::<Code>(),
            Err(Error::Huffman(HuffmanError::CodeLengthTooLong {
                length: 65,
                max: MAX_CODE_LEN
            }))
        ));
    }

    #[test]
    fn test_display_lists_sorted_entries() {
        let table = CodeTable::build(&chars("aabbb")).unwrap();
        assert_eq!(table.to_string(), "'a' : 0\n'b' : 1\n");
    }
}
