//! Codec error types.

use thiserror::Error;

/// Errors produced when decoding a frame from raw bytes.
///
/// Decode failures are per-frame results; the connection that produced the
/// bytes stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer is structurally invalid: shorter than the header, a
    /// declared length that does not match the payload, or a payload that
    /// violates the fixed size for its kind.
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// The kind byte does not name an assigned message kind.
    #[error("unknown message kind: {0}")]
    UnknownMessageKind(u8),
}

/// Errors produced when building a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The payload does not fit the 16-bit length field.
    #[error("payload of {0} bytes exceeds the 16-bit length field")]
    PayloadTooLarge(usize),
}
