//! Bit sequence → symbol sequence.
//!
//! A [`Decoder`] owns the inverse of a code table as a binary trie: each
//! code is a root-to-leaf path, each leaf holds its symbol. Decoding walks
//! the trie one bit at a time and emits a symbol whenever it lands on a
//! leaf, so every bit is visited once: O(n) in the encoded length.
//!
//! # State Machine
//!
//! ```text
//!            match                 offset < bit_len
//! Scanning ---------> Emitted ---------------------> Scanning
//!    |  \
//!    |   \ offset == bit_len (at a code boundary)
//!    |    `----------------------------------------> Done
//!    |
//!    `--- no child for the next bit, or bits run out
//!         mid-code ------------------------------> Failed
//! ```
//!
//! `Done` and `Failed` are terminal. A failure reports the bit offset where
//! the unmatched code started.

use crate::bitio::{BitReader, EncodedMessage};
use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::table::{Code, CodeTable};

const ROOT: usize = 0;

/// Decoder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Walking the trie, no symbol matched yet for the current code
    Scanning,
    /// A symbol was just emitted; the cursor sits on a code boundary
    Emitted,
    /// No code matches at the current offset
    Failed,
    /// Every meaningful bit was consumed
    Done,
}

#[derive(Debug, Clone)]
struct TrieNode<S> {
    /// Child index for bit 0 and bit 1
    children: [Option<u32>; 2],
    /// Set only on leaves
    symbol: Option<S>,
}

impl<S> TrieNode<S> {
    fn empty() -> Self {
        Self {
            children: [None, None],
            symbol: None,
        }
    }
}

/// Inverse code table (code → symbol) laid out as an arena trie.
#[derive(Debug, Clone)]
pub struct Decoder<S: Symbol> {
    nodes: Vec<TrieNode<S>>,
}

impl<S: Symbol> Decoder<S> {
    /// Build the trie for `table`.
    ///
    /// # Errors
    /// Returns `HuffmanError::InvalidTable` if the table isn't prefix-free.
    pub fn new(table: &CodeTable<S>) -> Result<Self> {
        let mut decoder = Self {
            nodes: vec![TrieNode::empty()],
        };
        for (symbol, code) in table.sorted() {
            decoder.insert(symbol, code)?;
        }
        Ok(decoder)
    }

    fn insert(&mut self, symbol: S, code: Code) -> Result<()> {
        let conflict = || {
            HuffmanError::InvalidTable(format!(
                "code {} for symbol {} collides with another code",
                code,
                symbol.label()
            ))
        };

        let mut node = ROOT;
        for i in 0..code.len() {
            if self.nodes[node].symbol.is_some() {
                return Err(conflict().into());
            }
            let bit = code.bit(i) as usize;
            node = match self.nodes[node].children[bit] {
                Some(next) => next as usize,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::empty());
                    self.nodes[node].children[bit] = Some(next as u32);
                    next
                }
            };
        }

        let leaf = &mut self.nodes[node];
        if leaf.symbol.is_some() || leaf.children.iter().any(Option::is_some) {
            return Err(conflict().into());
        }
        leaf.symbol = Some(symbol);
        Ok(())
    }

    /// Decode the first `bit_len` bits of `bits`.
    ///
    /// # Errors
    /// - `BitIoError::InsufficientBits` if `bits` is shorter than `bit_len`
    /// - `HuffmanError::Decode` if no code matches at some offset
    pub fn decode(&self, bits: &[u8], bit_len: usize) -> Result<Vec<S>> {
        let mut reader = BitReader::new(bits, bit_len)?;
        let mut output = Vec::new();

        let mut state = DecodeState::Scanning;
        let mut node = ROOT;
        let mut code_start = 0;

        loop {
            state = match state {
                DecodeState::Scanning if reader.is_empty() => {
                    if node == ROOT {
                        DecodeState::Done
                    } else {
                        DecodeState::Failed
                    }
                }
                DecodeState::Scanning => {
                    let bit = reader.read_bit()? as usize;
                    match self.nodes[node].children[bit] {
                        None => DecodeState::Failed,
                        Some(next) => {
                            node = next as usize;
                            match self.nodes[node].symbol {
                                Some(symbol) => {
                                    output.push(symbol);
                                    DecodeState::Emitted
                                }
                                None => DecodeState::Scanning,
                            }
                        }
                    }
                }
                DecodeState::Emitted => {
                    node = ROOT;
                    code_start = reader.position();
                    DecodeState::Scanning
                }
                DecodeState::Failed => {
                    tracing::debug!(offset = code_start, bit_len, "decode failed");
                    return Err(HuffmanError::Decode { offset: code_start }.into());
                }
                DecodeState::Done => break,
            };
        }

        tracing::debug!(bits = bit_len, symbols = output.len(), "decoded message");
        Ok(output)
    }

    /// Decode a whole [`EncodedMessage`].
    pub fn decode_message(&self, message: &EncodedMessage) -> Result<Vec<S>> {
        self.decode(message.bytes(), message.bit_len())
    }
}

/// Decode `bit_len` bits of `bits` with `table`.
///
/// Builds a [`Decoder`] for the table; reuse a decoder directly when decoding
/// many messages with the same table.
pub fn decode<S: Symbol>(bits: &[u8], bit_len: usize, table: &CodeTable<S>) -> Result<Vec<S>> {
    Decoder::new(table)?.decode(bits, bit_len)
}
