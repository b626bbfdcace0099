//! Motor state and move command wire values.

/// Per-motor drive state, used by telemetry reports and motor control frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MotorState {
    Idle = 0,
    Forward = 1,
    Backward = 2,
    Brake = 3,
}

impl MotorState {
    /// Parse a wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Forward),
            2 => Some(Self::Backward),
            3 => Some(Self::Brake),
            _ => None,
        }
    }

    /// The wire value of this state.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Single enumerated motor command carried by a move control frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveCommand {
    Motor1Idle = 0,
    Motor1Forward = 1,
    Motor1Backward = 2,
    Motor1Brake = 3,
    Motor2Idle = 4,
    Motor2Forward = 5,
    Motor2Backward = 6,
    Motor2Brake = 7,
}

impl MoveCommand {
    /// Parse a wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Motor1Idle),
            1 => Some(Self::Motor1Forward),
            2 => Some(Self::Motor1Backward),
            3 => Some(Self::Motor1Brake),
            4 => Some(Self::Motor2Idle),
            5 => Some(Self::Motor2Forward),
            6 => Some(Self::Motor2Backward),
            7 => Some(Self::Motor2Brake),
            _ => None,
        }
    }

    /// The wire value of this command.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
