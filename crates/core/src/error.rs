//! Error types for the huffcode codec.
//!
//! Every fallible operation returns a structured error instead of panicking.
//! None of these are retried internally: the codec is a pure computation, so
//! the same input and table always fail the same way.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Huffman: table construction, encoding, or decoding failures
/// - Bit I/O: reading bits past the end of a buffer
/// - Framing: container serialization/parsing
/// - CRC: container corruption detected
#[derive(Debug, Error)]
pub enum Error {
    /// Huffman codec error (empty input, unknown symbol, undecodable bits)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Container error (e.g., invalid header, length mismatch)
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },
}

/// Huffman codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// The input held zero symbols, so no tree can be built
    #[error("empty input: cannot build a code table from zero symbols")]
    EmptyInput,

    /// The code table has no entry for a symbol found in the input
    #[error("unknown symbol {symbol} at input position {position}")]
    UnknownSymbol { symbol: String, position: usize },

    /// No code matched the bits starting at `offset`
    #[error("no code matches the bit stream at bit offset {offset}")]
    Decode { offset: usize },

    /// Decoded symbol count doesn't match the recorded count
    #[error("decoded length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Tree depth exceeds what a packed code can hold
    #[error("code length {length} exceeds maximum {max}")]
    CodeLengthTooLong { length: usize, max: usize },

    /// A code table is malformed (duplicate symbol, empty code, not prefix-free)
    #[error("invalid code table: {0}")]
    InvalidTable(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the last meaningful bit
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// The declared bit length exceeds the bits actually supplied
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },
}

/// Container framing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Container version this build doesn't understand
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// Frame is too short to contain a valid header or its declared sections
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Bytes remain after the declared metadata and payload
    #[error("trailing bytes after frame: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    /// A section is too long for its `u32` length field
    #[error("{section} of {len} bytes exceeds the frame's u32 length field")]
    SectionTooLarge { section: &'static str, len: usize },

    /// The container was written for a different alphabet
    #[error("symbol kind mismatch: container holds {actual}, caller expects {expected}")]
    SymbolKindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Unrecognized symbol kind tag
    #[error("unknown symbol kind tag {0}")]
    UnknownSymbolKind(u8),

    /// Payload size disagrees with the declared bit length
    #[error("payload length mismatch: bit length needs {expected} bytes, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
