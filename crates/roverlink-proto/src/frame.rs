//! Frame layout and the raw encode/decode pair.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, EncodeError};
use crate::kind::MessageKind;

/// Bytes preceding the payload: one kind byte plus a little-endian u16 length.
pub const HEADER_LEN: usize = 3;

/// Largest payload representable by the length field.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// One complete wire message: a kind plus its length-prefixed payload.
///
/// A frame is the unit of transport; one network message is exactly one
/// frame. The declared length always equals the payload length: `decode`
/// enforces it and the constructor preserves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    kind: MessageKind,
    payload: Bytes,
}

impl Frame {
    /// Build a frame, checking only that the payload fits the length field.
    pub fn new(kind: MessageKind, payload: impl Into<Bytes>) -> Result<Self, EncodeError> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(EncodeError::PayloadTooLarge(payload.len()));
        }
        Ok(Self { kind, payload })
    }

    /// Internal constructor for payloads already known to fit.
    pub(crate) fn from_parts(kind: MessageKind, payload: Bytes) -> Self {
        debug_assert!(payload.len() <= MAX_PAYLOAD_LEN);
        Self { kind, payload }
    }

    /// The frame's message kind.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The payload bytes, without the header.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the frame, keeping the payload.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Serialize to wire form: kind byte, little-endian length, payload.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.payload.len());
        buf.put_u8(self.kind.as_u8());
        buf.put_u16_le(self.payload.len() as u16);
        buf.extend_from_slice(&self.payload);
        buf.freeze()
    }

    /// Parse one frame from a complete message buffer.
    ///
    /// Fails with [`DecodeError::MalformedFrame`] when the buffer is shorter
    /// than the header or the declared length does not match the remaining
    /// bytes, and with [`DecodeError::UnknownMessageKind`] for an unassigned
    /// kind byte. A failed decode never yields a partial frame.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() < HEADER_LEN {
            return Err(DecodeError::MalformedFrame(
                "buffer shorter than frame header",
            ));
        }
        let kind = MessageKind::from_u8(buf[0])?;
        let declared = u16::from_le_bytes([buf[1], buf[2]]) as usize;
        let payload = &buf[HEADER_LEN..];
        if payload.len() != declared {
            return Err(DecodeError::MalformedFrame(
                "declared length does not match payload",
            ));
        }
        Ok(Self {
            kind,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}
