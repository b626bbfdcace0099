//! Wire message kinds.

use crate::error::DecodeError;

/// Message kind discriminator, the first byte of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Reserved; never valid on the wire.
    Unknown = 0,

    /// Motor state report. Carried opaquely; the relay never interprets it.
    MotorState = 1,

    /// Combined motor/battery/distance report from a device.
    Telemetry = 2,

    /// Camera on/off command sent to a device.
    CameraControl = 3,

    /// One video chunk with its own length header, forwarded byte-for-byte.
    CameraChunk = 4,

    /// Direct per-motor drive command.
    MotorControl = 5,

    /// Single enumerated motor/axis command.
    MoveControl = 6,

    /// Battery level report.
    BatteryLevel = 7,

    /// Distance sensor report.
    DistanceReading = 8,
}

impl MessageKind {
    /// Parse a kind byte. Byte 0 is reserved and values above 8 are
    /// unassigned; both fail with [`DecodeError::UnknownMessageKind`].
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            1 => Ok(Self::MotorState),
            2 => Ok(Self::Telemetry),
            3 => Ok(Self::CameraControl),
            4 => Ok(Self::CameraChunk),
            5 => Ok(Self::MotorControl),
            6 => Ok(Self::MoveControl),
            7 => Ok(Self::BatteryLevel),
            8 => Ok(Self::DistanceReading),
            other => Err(DecodeError::UnknownMessageKind(other)),
        }
    }

    /// The wire value of this kind.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
