//! Structured text protocol spoken on client connections.
//!
//! Clients send small JSON requests tagged by `type`; the relay answers with
//! listing broadcasts, assumption confirmations, and error replies. Binary
//! frames travel next to these on the same socket and never touch this
//! module.

use roverlink_core::registry::DeviceInfo;
use roverlink_core::DeviceId;
use roverlink_proto::MotorState;
use serde::{Deserialize, Serialize};

/// Requests a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Ask for a fresh device listing broadcast.
    ListDevices,

    /// Request exclusive control of a device.
    AssumeDevice {
        #[serde(rename = "deviceId")]
        device_id: DeviceId,
    },

    /// Give up the currently controlled device.
    LeaveDevice,

    /// Key-style drive input, mapped to a motor command for the owned
    /// device.
    Control { action: ControlAction },
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Current device listing; broadcast to every client on any change.
    DeviceList { devices: Vec<DeviceInfo> },

    /// Confirmation that the requesting client now controls the device.
    DeviceAssumed {
        #[serde(rename = "deviceId")]
        device_id: DeviceId,
        name: String,
    },

    /// A refused request; the connection stays open.
    Error { message: String },
}

/// Fixed key-style drive actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Q,
    W,
    E,
    A,
    S,
    D,
    Space,
    Release,
}

impl ControlAction {
    /// Per-motor states driven by this action.
    pub fn motor_states(self) -> (MotorState, MotorState) {
        match self {
            ControlAction::Q => (MotorState::Forward, MotorState::Idle),
            ControlAction::W => (MotorState::Forward, MotorState::Forward),
            ControlAction::E => (MotorState::Idle, MotorState::Forward),
            ControlAction::A => (MotorState::Backward, MotorState::Idle),
            ControlAction::S => (MotorState::Backward, MotorState::Backward),
            ControlAction::D => (MotorState::Idle, MotorState::Backward),
            ControlAction::Space => (MotorState::Brake, MotorState::Brake),
            ControlAction::Release => (MotorState::Idle, MotorState::Idle),
        }
    }
}
