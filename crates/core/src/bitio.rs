//! Bit-level I/O for encoded messages.
//!
//! [`BitWriter`] appends codes MSB-first into a byte buffer and produces an
//! [`EncodedMessage`]. [`BitReader`] walks the bits of a message back out.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - EncodedMessage: records the exact count of meaningful bits, so padding
//!   and genuine zero bits are never confused
//! - BitReader: stops at the recorded bit length, never reads padding
//!
//! # Example
//! ```
//! use huffcode_core::bitio::{BitReader, BitWriter};
//! use huffcode_core::table::Code;
//!
//! let mut writer = BitWriter::new();
//! writer.write_code(Code::new(0b001, 3).unwrap());
//! writer.write_code(Code::new(0b1, 1).unwrap());
//! let message = writer.finish();
//!
//! assert_eq!(message.bit_len(), 4);
//! assert_eq!(message.to_bit_string(), "0011");
//!
//! let mut reader = BitReader::new(message.bytes(), message.bit_len()).unwrap();
//! assert!(!reader.read_bit().unwrap());
//! ```

use std::fmt;

use crate::error::{BitIoError, Result};
use crate::table::Code;

/// Encoded bits plus the number of bits that are meaningful.
///
/// # Invariants
/// - `bytes.len() == ceil(bit_len / 8)`
/// - Padding bits in the last byte are zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl EncodedMessage {
    /// Wrap raw bytes holding `bit_len` meaningful bits.
    ///
    /// Extra whole bytes beyond `ceil(bit_len / 8)` are dropped and padding
    /// bits are cleared.
    ///
    /// # Errors
    /// Returns `BitIoError::InsufficientBits` if `bytes` holds fewer than
    /// `bit_len` bits.
    pub fn from_parts(mut bytes: Vec<u8>, bit_len: usize) -> Result<Self> {
        let available = bytes.len() * 8;
        if bit_len > available {
            return Err(BitIoError::InsufficientBits {
                requested: bit_len,
                available,
            }
            .into());
        }

        bytes.truncate(bit_len.div_ceil(8));
        let tail = bit_len % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - tail);
            }
        }

        Ok(Self { bytes, bit_len })
    }

    /// Packed bits, MSB-first.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Count of meaningful bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Bit at `index`, or `None` past the end.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Render the bits as `0`/`1` characters, leading zeros included.
    pub fn to_bit_string(&self) -> String {
        (0..self.bit_len)
            .map(|i| if self.bit(i) == Some(true) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for EncodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

/// Writes codes MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_buffer` holds up to 7 bits (never a full byte), MSB-aligned
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer expecting roughly `bits` bits of output.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append every bit of `code`, first bit first.
    pub fn write_code(&mut self, code: Code) {
        let mut remaining = code.len();
        let value = code.bits();

        while remaining > 0 {
            // How many bits fit in the current byte?
            let take = remaining.min(8 - self.bit_count as usize);
            let shift = remaining - take;
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.bit_buffer |= chunk << (8 - self.bit_count as usize - take);
            self.bit_count += take as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            remaining = shift;
        }
    }

    /// Total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Finish writing, padding the last byte with zeros.
    pub fn finish(mut self) -> EncodedMessage {
        let bit_len = self.bit_len();
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        EncodedMessage {
            bytes: self.bytes,
            bit_len,
        }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first, stopping at a declared bit length.
///
/// # Invariants
/// - `position <= bit_len <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the first `bit_len` bits of `data`.
    ///
    /// # Errors
    /// Returns `BitIoError::InsufficientBits` if `data` is shorter than
    /// `bit_len` bits.
    pub fn new(data: &'a [u8], bit_len: usize) -> Result<Self> {
        let available = data.len() * 8;
        if bit_len > available {
            return Err(BitIoError::InsufficientBits {
                requested: bit_len,
                available,
            }
            .into());
        }
        Ok(Self {
            data,
            bit_len,
            position: 0,
        })
    }

    /// Read the next bit.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` once `bit_len` bits are consumed.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.position / 8];
        let bit = byte & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Ok(bit)
    }

    /// Current bit position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether all meaningful bits have been read.
    pub fn is_empty(&self) -> bool {
        self.position >= self.bit_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(bits: u64, len: usize) -> Code {
        Code::new(bits, len).unwrap()
    }

    #[test]
    fn test_write_partial_codes() {
        let mut writer = BitWriter::new();
        writer.write_code(code(0b101, 3));
        writer.write_code(code(0b11, 2));
        // Total: 10111 -> padded to 10111000

        let message = writer.finish();
        assert_eq!(message.bytes(), &[0b10111000]);
        assert_eq!(message.bit_len(), 5);
        assert_eq!(message.to_bit_string(), "10111");
    }

    #[test]
    fn test_leading_zeros_preserved() {
        let mut writer = BitWriter::new();
        writer.write_code(code(0, 1));
        writer.write_code(code(0, 1));
        writer.write_code(code(0b01, 2));

        let message = writer.finish();
        assert_eq!(message.bytes(), &[0b00010000]);
        assert_eq!(message.bit_len(), 4);
        assert_eq!(message.to_string(), "0001");
    }

    #[test]
    fn test_code_spanning_bytes() {
        let mut writer = BitWriter::new();
        writer.write_code(code(0b111, 3));
        writer.write_code(code(0b1010101111110000, 16));

        let message = writer.finish();
        assert_eq!(message.bytes(), &[0b11110101, 0b01111110, 0b00000000]);
        assert_eq!(message.bit_len(), 19);
    }

    #[test]
    fn test_64_bit_code() {
        let val = 0x123456789ABCDEF0u64;
        let mut writer = BitWriter::new();
        writer.write_code(code(val, 64));
        let message = writer.finish();
        assert_eq!(message.bytes(), &val.to_be_bytes());
    }

    #[test]
    fn test_single_bit_codes_match_long_code() {
        let mut by_bit = BitWriter::new();
        for bit in [1, 0, 1, 1, 0, 0, 1, 0, 1] {
            by_bit.write_code(code(bit, 1));
        }
        let mut by_code = BitWriter::new();
        by_code.write_code(code(0b101100101, 9));

        assert_eq!(by_bit.finish(), by_code.finish());
    }

    #[test]
    fn test_reader_stops_at_bit_len() {
        let data = [0b10100000];
        let mut reader = BitReader::new(&data, 3).unwrap();

        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_empty());
        assert_eq!(reader.position(), 3);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_reader_rejects_excess_bit_len() {
        let result = BitReader::new(&[0xFF], 9);
        assert!(matches!(
            result,
            Err(crate::error::Error::BitIo(BitIoError::InsufficientBits {
                requested: 9,
                available: 8
            }))
        ));
    }

    #[test]
    fn test_from_parts_normalizes() {
        let message = EncodedMessage::from_parts(vec![0xFF, 0xFF, 0xFF], 10).unwrap();
        assert_eq!(message.bytes(), &[0xFF, 0b11000000]);
        assert_eq!(message.bit(9), Some(true));
        assert_eq!(message.bit(10), None);

        assert!(EncodedMessage::from_parts(vec![0x00], 9).is_err());
    }

    #[test]
    fn test_empty_message() {
        let message = BitWriter::new().finish();
        assert!(message.is_empty());
        assert!(message.bytes().is_empty());
        assert_eq!(message.to_bit_string(), "");
    }
}
