//! Self-describing container for an encoded message and its code table.
//!
//! An [`EncodedMessage`] is useless without the table that produced it and
//! the exact bit length. A frame packages all of it with a checksum:
//! - Header: alphabet, symbol count, bit length, section lengths, CRC
//! - Codec metadata: the serialized [`CodeTable`]
//! - Payload: the encoded bits
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x43 ("HUFC")
//! +------------------+
//! | version (1)      |  currently 1
//! +------------------+
//! | symbol_kind (1)  |  0 = bytes, 1 = chars
//! +------------------+
//! | symbol_count (8) |  u64 symbols in the original input
//! +------------------+
//! | bit_len (8)      |  u64 meaningful bits in the payload
//! +------------------+
//! | table_len (4)    |  u32 length of codec metadata
//! +------------------+
//! | payload_len (4)  |  u32 length of payload, = ceil(bit_len / 8)
//! +------------------+
//! | crc32 (4)        |  u32 checksum
//! +------------------+
//! | codec_metadata   |  code table (table_len bytes)
//! +------------------+
//! | payload          |  encoded bits (payload_len bytes)
//! +------------------+
//! ```
//!
//! # CRC Coverage
//!
//! The CRC32 covers every header field after the magic (except the CRC
//! itself), the codec metadata and the payload.

use crate::bitio::EncodedMessage;
use crate::decoder::Decoder;
use crate::encoder::encode;
use crate::error::{Error, FramingError, HuffmanError, Result};
use crate::symbol::{Symbol, SymbolKind};
use crate::table::CodeTable;

/// Magic number for frames: "HUFC"
const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x43];

/// Container version written by this build
pub const VERSION: u8 = 1;

/// Size of the frame header in bytes
pub const HEADER_SIZE: usize = 34;

/// A parsed frame: everything needed to reconstruct the input.
#[derive(Debug, Clone)]
pub struct Frame<S: Symbol> {
    /// Symbols in the original input
    pub symbol_count: u64,

    /// Table the payload was encoded with
    pub table: CodeTable<S>,

    /// Encoded bits and their exact length
    pub message: EncodedMessage,
}

/// Header fields, in wire order.
struct Header {
    kind: u8,
    symbol_count: u64,
    bit_len: u64,
    table_len: u32,
    payload_len: u32,
}

impl Header {
    /// Bytes covered by the CRC, excluding metadata and payload.
    fn crc_fields(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE - 8);
        out.push(VERSION);
        out.push(self.kind);
        out.extend_from_slice(&self.symbol_count.to_le_bytes());
        out.extend_from_slice(&self.bit_len.to_le_bytes());
        out.extend_from_slice(&self.table_len.to_le_bytes());
        out.extend_from_slice(&self.payload_len.to_le_bytes());
        out
    }
}

/// Serialize a message, its table, and the input length into a frame.
///
/// # Errors
/// Returns `FramingError::SectionTooLarge` if the metadata or payload is
/// longer than a `u32` length field can record (4 GiB).
pub fn pack<S: Symbol>(
    message: &EncodedMessage,
    table: &CodeTable<S>,
    symbol_count: usize,
) -> Result<Vec<u8>> {
    let metadata = table.serialize_metadata();
    let payload = message.bytes();

    let header = Header {
        kind: S::KIND.tag(),
        symbol_count: symbol_count as u64,
        bit_len: message.bit_len() as u64,
        table_len: section_len("codec metadata", metadata.len())?,
        payload_len: section_len("payload", payload.len())?,
    };
    let fields = header.crc_fields();
    let crc32 = compute_crc(&fields, &metadata, payload);

    let mut frame = Vec::with_capacity(HEADER_SIZE + metadata.len() + payload.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&fields);
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(&metadata);
    frame.extend_from_slice(payload);

    tracing::debug!(
        symbols = symbol_count,
        bits = message.bit_len(),
        table_bytes = metadata.len(),
        frame_bytes = frame.len(),
        "packed frame"
    );
    Ok(frame)
}

/// Read the alphabet of a frame without parsing the rest.
///
/// Lets a caller pick the right `S` before calling [`unpack`].
pub fn peek_kind(bytes: &[u8]) -> Result<SymbolKind> {
    check_prefix(bytes)?;
    SymbolKind::from_tag(bytes[5])
}

/// Parse a frame.
///
/// # Errors
/// - `FramingError::FrameTooShort` if the buffer is truncated
/// - `FramingError::TrailingBytes` if bytes follow the declared sections
/// - `FramingError::InvalidMagic` / `UnsupportedVersion` for foreign data
/// - `Error::Crc` if the checksum doesn't match
/// - `FramingError::SymbolKindMismatch` if written for another alphabet
/// - `FramingError::PayloadLengthMismatch` if payload and bit length disagree
/// - Propagates code table deserialization errors
pub fn unpack<S: Symbol>(bytes: &[u8]) -> Result<Frame<S>> {
    check_prefix(bytes)?;

    let header = Header {
        kind: bytes[5],
        symbol_count: u64::from_le_bytes(field(bytes, 6)),
        bit_len: u64::from_le_bytes(field(bytes, 14)),
        table_len: u32::from_le_bytes(field(bytes, 22)),
        payload_len: u32::from_le_bytes(field(bytes, 26)),
    };
    let crc32 = u32::from_le_bytes(field(bytes, 30));

    // Validate total frame size
    let expected_size = HEADER_SIZE + header.table_len as usize + header.payload_len as usize;
    if bytes.len() < expected_size {
        return Err(FramingError::FrameTooShort {
            required: expected_size,
            actual: bytes.len(),
        }
        .into());
    }
    if bytes.len() > expected_size {
        return Err(FramingError::TrailingBytes {
            expected: expected_size,
            actual: bytes.len(),
        }
        .into());
    }

    let meta_end = HEADER_SIZE + header.table_len as usize;
    let metadata = &bytes[HEADER_SIZE..meta_end];
    let payload = &bytes[meta_end..];

    let computed = compute_crc(&header.crc_fields(), metadata, payload);
    if computed != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed,
        });
    }

    let kind = SymbolKind::from_tag(header.kind)?;
    if kind != S::KIND {
        return Err(FramingError::SymbolKindMismatch {
            expected: S::KIND.name(),
            actual: kind.name(),
        }
        .into());
    }

    let bit_len = header.bit_len as usize;
    let needed = bit_len.div_ceil(8);
    if payload.len() != needed {
        return Err(FramingError::PayloadLengthMismatch {
            expected: needed,
            actual: payload.len(),
        }
        .into());
    }

    let table = CodeTable::deserialize_metadata(metadata)?;
    let message = EncodedMessage::from_parts(payload.to_vec(), bit_len)?;

    Ok(Frame {
        symbol_count: header.symbol_count,
        table,
        message,
    })
}

/// Compress `input` and pack the result into a frame.
pub fn compress_to_frame<S: Symbol>(input: &[S]) -> Result<Vec<u8>> {
    let table = CodeTable::build(input)?;
    let message = encode(input, &table)?;
    pack(&message, &table, input.len())
}

/// Decode a parsed frame back to the original symbols.
///
/// # Errors
/// Returns `HuffmanError::LengthMismatch` if the decoded symbol count
/// differs from the count recorded in the header.
pub fn decompress_frame<S: Symbol>(frame: &Frame<S>) -> Result<Vec<S>> {
    let decoded = Decoder::new(&frame.table)?.decode_message(&frame.message)?;

    if decoded.len() as u64 != frame.symbol_count {
        return Err(HuffmanError::LengthMismatch {
            expected: frame.symbol_count as usize,
            actual: decoded.len(),
        }
        .into());
    }
    Ok(decoded)
}

/// Validate size, magic and version.
fn check_prefix(bytes: &[u8]) -> Result<()> {
    if bytes.len() < HEADER_SIZE {
        return Err(FramingError::FrameTooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let magic: [u8; 4] = field(bytes, 0);
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    if bytes[4] != VERSION {
        return Err(FramingError::UnsupportedVersion(bytes[4]).into());
    }
    Ok(())
}

/// Length of a frame section as its `u32` header field.
fn section_len(section: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| FramingError::SectionTooLarge { section, len }.into())
}

/// Copy `N` bytes at `at`. Callers check the buffer holds a full header.
fn field<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}

fn compute_crc(fields: &[u8], metadata: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(fields);
    hasher.update(metadata);
    hasher.update(payload);
    hasher.finalize()
}
