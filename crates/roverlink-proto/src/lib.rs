//! # roverlink-proto
//!
//! Binary frame protocol shared by rover devices and the relay.
//!
//! Every wire message is exactly one frame: a kind byte, a little-endian
//! 16-bit payload length, and the payload. This crate provides:
//!
//! - **Frames**: the raw kind + length + payload layout with encode/decode
//! - **Messages**: typed payload views with per-kind size enforcement
//! - **Tables**: motor state and move command wire values

pub mod error;
pub mod frame;
pub mod kind;
pub mod message;
pub mod motor;

pub use error::{DecodeError, EncodeError};
pub use frame::{Frame, HEADER_LEN, MAX_PAYLOAD_LEN};
pub use kind::MessageKind;
pub use message::{
    BatteryLevel, CameraChunk, CameraControl, DistanceReading, Message, MotorControl, MoveControl,
    Telemetry,
};
pub use motor::{MotorState, MoveCommand};
