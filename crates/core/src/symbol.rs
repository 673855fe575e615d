//! Symbol alphabets the codec can compress.
//!
//! The codec is generic over its alphabet. A symbol only needs equality,
//! hashing (for O(1) code lookup) and a total order (for deterministic
//! tie-breaking while the tree is built). Each alphabet also has a fixed-width
//! byte form so code tables can be serialized next to the payload.
//!
//! | Kind   | Rust type | Tag | Width | Encoding                 |
//! |--------|-----------|-----|-------|--------------------------|
//! | `Byte` | `u8`      | 0   | 1     | the byte itself          |
//! | `Char` | `char`    | 1   | 4     | Unicode scalar, u32 LE   |

use std::fmt;
use std::hash::Hash;

use crate::error::{FramingError, Result};

/// Alphabet tag recorded in serialized tables and containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Byte,
    Char,
}

impl SymbolKind {
    /// Wire tag for this kind.
    pub fn tag(self) -> u8 {
        match self {
            SymbolKind::Byte => 0,
            SymbolKind::Char => 1,
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(SymbolKind::Byte),
            1 => Ok(SymbolKind::Char),
            other => Err(FramingError::UnknownSymbolKind(other).into()),
        }
    }

    /// Number of bytes one serialized symbol occupies.
    pub fn width(self) -> usize {
        match self {
            SymbolKind::Byte => 1,
            SymbolKind::Char => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SymbolKind::Byte => "bytes",
            SymbolKind::Char => "chars",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An atomic unit of the input alphabet.
pub trait Symbol: Copy + Eq + Hash + Ord + fmt::Debug {
    /// Which alphabet this type belongs to.
    const KIND: SymbolKind;

    /// Append the fixed-width byte form of this symbol.
    fn write_bytes(&self, out: &mut Vec<u8>);

    /// Parse a symbol from exactly `KIND.width()` bytes.
    ///
    /// Returns `None` if the bytes don't name a valid symbol.
    fn read_bytes(bytes: &[u8]) -> Option<Self>;

    /// Printable label used in code table listings.
    fn label(&self) -> String;
}

impl Symbol for u8 {
    const KIND: SymbolKind = SymbolKind::Byte;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b] => Some(*b),
            _ => None,
        }
    }

    fn label(&self) -> String {
        if self.is_ascii_graphic() {
            format!("{:#04x} '{}'", self, *self as char)
        } else {
            format!("{:#04x}", self)
        }
    }
}

impl Symbol for char {
    const KIND: SymbolKind = SymbolKind::Char;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&u32::from(*self).to_le_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 4] = bytes.try_into().ok()?;
        char::from_u32(u32::from_le_bytes(raw))
    }

    fn label(&self) -> String {
        format!("{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for kind in [SymbolKind::Byte, SymbolKind::Char] {
            assert_eq!(SymbolKind::from_tag(kind.tag()).unwrap(), kind);
        }
        assert!(SymbolKind::from_tag(7).is_err());
    }

    #[test]
    fn test_char_bytes() {
        let mut out = Vec::new();
        'é'.write_bytes(&mut out);
        assert_eq!(out.len(), SymbolKind::Char.width());
        assert_eq!(char::read_bytes(&out), Some('é'));
    }

    #[test]
    fn test_invalid_char_scalar() {
        // Surrogate range is not a valid char
        let bytes = 0xD800u32.to_le_bytes();
        assert_eq!(char::read_bytes(&bytes), None);
    }

    #[test]
    fn test_byte_wrong_width() {
        assert_eq!(u8::read_bytes(&[1, 2]), None);
        assert_eq!(u8::read_bytes(&[0x41]), Some(0x41));
    }

    #[test]
    fn test_labels() {
        assert_eq!(b'a'.label(), "0x61 'a'");
        assert_eq!(b'\n'.label(), "0x0a");
        assert_eq!(' '.label(), "' '");
    }
}
