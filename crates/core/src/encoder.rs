//! Symbol sequence → bit sequence.

use crate::bitio::{BitWriter, EncodedMessage};
use crate::error::{HuffmanError, Result};
use crate::symbol::Symbol;
use crate::table::CodeTable;

/// Replace each symbol with its code and concatenate, in input order.
///
/// Code lookup is a hash lookup, so the whole pass is O(n).
///
/// # Errors
/// Returns `HuffmanError::UnknownSymbol` for the first symbol the table has
/// no code for. Nothing is skipped.
pub fn encode<S: Symbol>(input: &[S], table: &CodeTable<S>) -> Result<EncodedMessage> {
    let mut writer = BitWriter::with_capacity(input.len() * table.max_code_len());

    for (position, symbol) in input.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or_else(|| HuffmanError::UnknownSymbol {
                symbol: symbol.label(),
                position,
            })?;
        writer.write_code(code);
    }

    let message = writer.finish();
    tracing::debug!(
        symbols = input.len(),
        bits = message.bit_len(),
        bytes = message.bytes().len(),
        "encoded message"
    );
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_encode_abracadabra() {
        let input: Vec<char> = "abracadabra".chars().collect();
        let table = CodeTable::build(&input).unwrap();
        let message = encode(&input, &table).unwrap();

        // a=0 r=10 b=110 c=1110 d=1111
        assert_eq!(message.to_bit_string(), "01101001110011110110100");
        assert_eq!(message.bit_len(), 23);
    }

    #[test]
    fn test_encode_single_symbol() {
        let table = CodeTable::build(b"zzzz").unwrap();
        let message = encode(b"zzz", &table).unwrap();
        assert_eq!(message.to_bit_string(), "000");
        assert_eq!(message.bytes(), &[0]);
    }

    #[test]
    fn test_unknown_symbol() {
        let table = CodeTable::build(b"abc").unwrap();
        let result = encode(b"abxc", &table);
        match result {
            Err(Error::Huffman(HuffmanError::UnknownSymbol { position, .. })) => {
                assert_eq!(position, 2)
            }
            other => panic!("expected UnknownSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_empty_input() {
        let table = CodeTable::build(b"aabbbcccc").unwrap();
        let message = encode(b"", &table).unwrap();
        assert!(message.is_empty());
    }
}
