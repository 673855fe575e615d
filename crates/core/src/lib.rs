//! huffcode-core: Huffman prefix-code compression
//!
//! This library turns a symbol sequence into a length-optimal prefix-free
//! binary encoding for its observed symbol frequencies, and back again.
//!
//! # Architecture
//!
//! Data flows strictly forward through one module per stage:
//! - `frequency`: count symbol occurrences
//! - `tree`: greedily merge the lightest nodes into a Huffman tree
//! - `table`: walk the tree to assign each symbol its code
//! - `encoder`: substitute codes for symbols, recording the exact bit length
//! - `decoder`: walk an inverse-code trie to recover symbols
//!
//! Supporting modules:
//! - `bitio`: bit-level writing/reading and `EncodedMessage`
//! - `symbol`: the alphabets the codec works over (`u8`, `char`)
//! - `framing`: self-describing container with CRC
//! - `stats`: compression figures against raw, fixed-width and entropy
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Ties are broken by symbol order, so the same input
//!   always yields the same table
//! - **Explicit length**: Bit length always travels with the bits
//!
//! # Example
//! ```
//! let (message, table) = huffcode_core::compress(b"abracadabra").unwrap();
//! assert_eq!(message.bit_len(), 23);
//!
//! let decoded = huffcode_core::decompress(&message, &table).unwrap();
//! assert_eq!(decoded, b"abracadabra");
//! ```

pub mod bitio;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod frequency;
pub mod stats;
pub mod symbol;
pub mod table;
pub mod tree;

// Re-export commonly used types
pub use bitio::EncodedMessage;
pub use decoder::{decode, Decoder};
pub use encoder::encode;
pub use error::{Error, Result};
pub use symbol::{Symbol, SymbolKind};
pub use table::{Code, CodeTable};

/// Build the code table for `input`.
///
/// # Errors
/// Returns `HuffmanError::EmptyInput` if `input` has no symbols.
pub fn build_code_table<S: Symbol>(input: &[S]) -> Result<CodeTable<S>> {
    CodeTable::build(input)
}

/// Build a table for `input` and encode it.
///
/// The table must travel with the message; it is the only way to decode it.
pub fn compress<S: Symbol>(input: &[S]) -> Result<(EncodedMessage, CodeTable<S>)> {
    let table = CodeTable::build(input)?;
    let message = encode(input, &table)?;
    Ok((message, table))
}

/// Decode a message produced by [`compress`].
pub fn decompress<S: Symbol>(message: &EncodedMessage, table: &CodeTable<S>) -> Result<Vec<S>> {
    decode(message.bytes(), message.bit_len(), table)
}

/// Compress text, one symbol per `char`.
pub fn compress_str(text: &str) -> Result<(EncodedMessage, CodeTable<char>)> {
    let symbols: Vec<char> = text.chars().collect();
    compress(&symbols)
}

/// Decode a message produced by [`compress_str`].
pub fn decompress_to_string(message: &EncodedMessage, table: &CodeTable<char>) -> Result<String> {
    Ok(decompress(message, table)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let text = "There is a spectre haunting europe, the spectre of communism.";
        let (message, table) = compress_str(text).unwrap();
        assert_eq!(decompress_to_string(&message, &table).unwrap(), text);
    }

    #[test]
    fn test_leading_zero_message() {
        // "a" gets code 0 in a one-symbol table; a bare integer would lose it
        let (message, table) = compress_str("aaaa").unwrap();
        assert_eq!(message.to_bit_string(), "0000");
        assert_eq!(decompress_to_string(&message, &table).unwrap(), "aaaa");
    }
}
