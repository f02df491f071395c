//! Error types for the protocol layer.
//!
//! Each crate in Gobang defines its own error enum. When you see a
//! `ProtocolError`, the problem is in framing or payload decoding, not in
//! networking or room management.

/// Errors that can occur while encoding or decoding wire data.
///
/// The receive loop treats every one of these as fatal for the connection:
/// once a payload fails to decode, the framing boundary of the next
/// message can't be trusted any more.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The header's length field is smaller than the header itself.
    #[error("invalid frame length {0}: must be at least 4")]
    InvalidLength(u16),

    /// The payload ended before a field could be read.
    #[error("insufficient data: need {needed} more bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The payload had bytes left over after the last field.
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),

    /// A field held a value outside its schema (bad bool, unknown enum
    /// discriminant, invalid UTF-8, ...).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The encoded message would not fit in the 16-bit length field.
    #[error("payload of {0} bytes does not fit in a frame")]
    PayloadTooLarge(usize),
}
