//! WebSocket relay gateways for Roverlink.
//!
//! This crate provides:
//! - The device-facing control gateway and the viewer-facing client gateway
//! - The relay mediator binding registry state to cross-gateway delivery
//! - The Axum server exposing both WebSocket endpoints and a health probe

pub mod client;
pub mod control;
pub mod error;
pub mod mediator;
pub mod messages;
pub mod server;
pub mod session;

pub use client::{ClientRole, ClientRoster};
pub use control::DeviceRole;
pub use error::GatewayError;
pub use mediator::RelayMediator;
pub use messages::{ClientRequest, ControlAction, ServerMessage};
pub use server::RelayServer;
pub use session::ConnectionRole;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
