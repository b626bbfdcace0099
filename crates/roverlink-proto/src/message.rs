//! Typed message layer over raw frames.
//!
//! [`Message::decode`] applies the per-kind payload rules on top of
//! [`Frame::decode`]; the constructors produce the canonical encodings rover
//! firmware expects.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, EncodeError};
use crate::frame::{Frame, MAX_PAYLOAD_LEN};
use crate::kind::MessageKind;
use crate::motor::MoveCommand;

/// Combined motor/battery/distance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telemetry {
    pub motor1: u8,
    pub motor2: u8,
    pub battery: u8,
    pub distance: u8,
}

/// Camera on/off command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraControl {
    pub on: bool,
}

/// One video chunk with its inner length header validated.
///
/// The chunk data stays opaque. Relaying code forwards the original frame
/// bytes untouched, so this view never re-encodes on the video path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraChunk {
    pub data: Bytes,
}

/// Direct per-motor drive command. Values are raw wire bytes; see
/// [`MotorState`](crate::MotorState) for the assigned states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorControl {
    pub motor1: u8,
    pub motor2: u8,
}

/// Single enumerated motor/axis command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveControl {
    pub cmd: u8,
}

/// Battery level report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryLevel {
    pub level: u8,
}

/// Distance sensor report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceReading {
    pub distance: u8,
}

/// A decoded frame with its kind-specific payload rules applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Opaque to the relay; no size constraint.
    MotorState(Bytes),
    Telemetry(Telemetry),
    CameraControl(CameraControl),
    CameraChunk(CameraChunk),
    MotorControl(MotorControl),
    MoveControl(MoveControl),
    BatteryLevel(BatteryLevel),
    DistanceReading(DistanceReading),
}

impl Message {
    /// Decode one complete message buffer, enforcing per-kind payload sizes.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let frame = Frame::decode(buf)?;
        match frame.kind() {
            // Frame::decode rejects the reserved kind byte already.
            MessageKind::Unknown => Err(DecodeError::UnknownMessageKind(0)),
            MessageKind::MotorState => Ok(Self::MotorState(frame.into_payload())),
            MessageKind::Telemetry => {
                let p = fixed_payload(&frame, 4, "telemetry payload must be 4 bytes")?;
                Ok(Self::Telemetry(Telemetry {
                    motor1: p[0],
                    motor2: p[1],
                    battery: p[2],
                    distance: p[3],
                }))
            }
            MessageKind::CameraControl => {
                let p = fixed_payload(&frame, 1, "camera control payload must be 1 byte")?;
                Ok(Self::CameraControl(CameraControl { on: p[0] != 0 }))
            }
            MessageKind::CameraChunk => {
                let payload = frame.payload();
                if payload.len() < 2 {
                    return Err(DecodeError::MalformedFrame(
                        "camera chunk shorter than its length header",
                    ));
                }
                let declared = u16::from_le_bytes([payload[0], payload[1]]) as usize;
                if payload.len() - 2 != declared {
                    return Err(DecodeError::MalformedFrame(
                        "camera chunk length does not match its data",
                    ));
                }
                Ok(Self::CameraChunk(CameraChunk {
                    data: frame.into_payload().slice(2..),
                }))
            }
            MessageKind::MotorControl => {
                let p = fixed_payload(&frame, 2, "motor control payload must be 2 bytes")?;
                Ok(Self::MotorControl(MotorControl {
                    motor1: p[0],
                    motor2: p[1],
                }))
            }
            MessageKind::MoveControl => {
                let p = fixed_payload(&frame, 1, "move control payload must be 1 byte")?;
                Ok(Self::MoveControl(MoveControl { cmd: p[0] }))
            }
            MessageKind::BatteryLevel => {
                let p = fixed_payload(&frame, 1, "battery level payload must be 1 byte")?;
                Ok(Self::BatteryLevel(BatteryLevel { level: p[0] }))
            }
            MessageKind::DistanceReading => {
                let p = fixed_payload(&frame, 1, "distance reading payload must be 1 byte")?;
                Ok(Self::DistanceReading(DistanceReading { distance: p[0] }))
            }
        }
    }

    /// The wire kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::MotorState(_) => MessageKind::MotorState,
            Self::Telemetry(_) => MessageKind::Telemetry,
            Self::CameraControl(_) => MessageKind::CameraControl,
            Self::CameraChunk(_) => MessageKind::CameraChunk,
            Self::MotorControl(_) => MessageKind::MotorControl,
            Self::MoveControl(_) => MessageKind::MoveControl,
            Self::BatteryLevel(_) => MessageKind::BatteryLevel,
            Self::DistanceReading(_) => MessageKind::DistanceReading,
        }
    }

    /// Serialize to canonical wire form.
    pub fn encode(&self) -> Bytes {
        let frame = match self {
            Self::MotorState(data) => Frame::from_parts(MessageKind::MotorState, data.clone()),
            Self::Telemetry(t) => Frame::from_parts(
                MessageKind::Telemetry,
                Bytes::copy_from_slice(&[t.motor1, t.motor2, t.battery, t.distance]),
            ),
            Self::CameraControl(c) => Frame::from_parts(
                MessageKind::CameraControl,
                Bytes::copy_from_slice(&[u8::from(c.on)]),
            ),
            Self::CameraChunk(c) => {
                let mut payload = BytesMut::with_capacity(2 + c.data.len());
                payload.put_u16_le(c.data.len() as u16);
                payload.extend_from_slice(&c.data);
                Frame::from_parts(MessageKind::CameraChunk, payload.freeze())
            }
            Self::MotorControl(m) => Frame::from_parts(
                MessageKind::MotorControl,
                Bytes::copy_from_slice(&[m.motor1, m.motor2]),
            ),
            Self::MoveControl(m) => {
                Frame::from_parts(MessageKind::MoveControl, Bytes::copy_from_slice(&[m.cmd]))
            }
            Self::BatteryLevel(b) => {
                Frame::from_parts(MessageKind::BatteryLevel, Bytes::copy_from_slice(&[b.level]))
            }
            Self::DistanceReading(d) => Frame::from_parts(
                MessageKind::DistanceReading,
                Bytes::copy_from_slice(&[d.distance]),
            ),
        };
        frame.encode()
    }

    /// Camera activation command, `[3, 1, 0, on]` on the wire.
    pub fn camera_control(on: bool) -> Self {
        Self::CameraControl(CameraControl { on })
    }

    /// Per-motor drive command, `[5, 2, 0, motor1, motor2]` on the wire.
    pub fn motor_control(motor1: u8, motor2: u8) -> Self {
        Self::MotorControl(MotorControl { motor1, motor2 })
    }

    /// Enumerated move command, `[6, 1, 0, cmd]` on the wire.
    pub fn move_control(cmd: MoveCommand) -> Self {
        Self::MoveControl(MoveControl { cmd: cmd.as_u8() })
    }

    /// Telemetry report, `[2, 4, 0, motor1, motor2, battery, distance]`.
    pub fn telemetry(motor1: u8, motor2: u8, battery: u8, distance: u8) -> Self {
        Self::Telemetry(Telemetry {
            motor1,
            motor2,
            battery,
            distance,
        })
    }

    /// Video chunk with its inner length header, `[4, lo(n+2), hi(n+2),
    /// lo(n), hi(n), ...data]` for `n` data bytes. Fails when the chunk plus
    /// header exceeds the frame length field.
    pub fn camera_chunk(data: impl Into<Bytes>) -> Result<Self, EncodeError> {
        let data = data.into();
        if data.len() + 2 > MAX_PAYLOAD_LEN {
            return Err(EncodeError::PayloadTooLarge(data.len() + 2));
        }
        Ok(Self::CameraChunk(CameraChunk { data }))
    }
}

fn fixed_payload<'a>(
    frame: &'a Frame,
    expected: usize,
    reason: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let payload = frame.payload();
    if payload.len() != expected {
        return Err(DecodeError::MalformedFrame(reason));
    }
    Ok(payload)
}
