//! Routing policy between the two connection classes.
//!
//! The mediator is the only place that binds registry transitions to
//! cross-gateway delivery: listing changes fan out to every client, frames
//! from a device reach its current owner only, and owner commands reach the
//! owned device only. Device and client handling never call each other
//! directly; both call in here.
//!
//! Ownership is per-device and explicit. Nothing in this module keys off
//! "first client" or "last client"; the camera follows assume/release
//! transitions for one device at a time.

use std::sync::Arc;

use bytes::Bytes;
use roverlink_core::{ClientId, ConnectionHandle, DeviceId, DeviceRegistry};
use roverlink_proto::Message;
use tracing::{debug, error, info};

use crate::client::ClientRoster;
use crate::messages::{ClientRequest, ControlAction, ServerMessage};

/// Central router over one registry and one client roster.
pub struct RelayMediator {
    registry: Arc<DeviceRegistry>,
    roster: ClientRoster,
}

impl RelayMediator {
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self {
            registry,
            roster: ClientRoster::new(),
        }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn client_count(&self) -> usize {
        self.roster.len()
    }

    pub fn device_count(&self) -> usize {
        self.registry.device_count()
    }

    // ---- device events -------------------------------------------------

    /// A device socket opened: admit it and announce the new listing.
    pub fn device_connected(&self, link: ConnectionHandle) -> DeviceId {
        let id = self.registry.register(link);
        self.announce_devices();
        id
    }

    /// A device socket closed: drop its record and announce the shrunken
    /// listing. The force-released owner, if any, learns from the listing;
    /// there is no device left to deactivate.
    pub fn device_disconnected(&self, id: &DeviceId) {
        if self.registry.unregister(id).is_some() {
            self.announce_devices();
        }
    }

    /// A binary frame arrived from a device.
    ///
    /// Telemetry-class frames and video chunks go to the current owner,
    /// verbatim. Without an owner the frame is dropped; both paths are the
    /// normal lossy behavior, not errors.
    pub fn device_frame(&self, id: &DeviceId, data: Bytes) {
        match Message::decode(&data) {
            Ok(
                Message::Telemetry(_)
                | Message::BatteryLevel(_)
                | Message::DistanceReading(_)
                | Message::CameraChunk(_),
            ) => {
                if let Some(owner) = self.registry.owner_of(id) {
                    self.roster.send_binary(&owner, data);
                }
            }
            Ok(message) => {
                debug!(device = %id, kind = ?message.kind(), "dropping unroutable device frame");
            }
            Err(err) => {
                debug!(device = %id, error = %err, "dropping malformed device frame");
            }
        }
    }

    // ---- client events -------------------------------------------------

    /// A client socket opened: track it and announce the listing to all.
    pub fn client_connected(&self, client: ClientId, link: ConnectionHandle) {
        self.roster.insert(client, link);
        self.announce_devices();
    }

    /// A client socket closed: release whatever it controlled.
    pub fn client_disconnected(&self, client: &ClientId) {
        self.roster.remove(client);
        if let Some(device) = self.registry.release_owned_by(client) {
            self.send_camera(&device, false);
            self.announce_devices();
        }
    }

    /// A structured text request arrived from a client.
    pub fn client_request(&self, client: &ClientId, text: &str) {
        let request = match serde_json::from_str::<ClientRequest>(text) {
            Ok(request) => request,
            Err(err) => {
                debug!(client = %client, error = %err, "unparseable client request");
                self.reply_error(client, "unsupported message");
                return;
            }
        };

        match request {
            ClientRequest::ListDevices => self.announce_devices(),
            ClientRequest::AssumeDevice { device_id } => self.assume_device(client, &device_id),
            ClientRequest::LeaveDevice => self.leave_device(client),
            ClientRequest::Control { action } => self.control(client, action),
        }
    }

    /// A raw binary frame arrived from a client.
    ///
    /// Only drive commands pass, and only from the current owner of some
    /// device; everything else is dropped with the connection left open.
    pub fn client_frame(&self, client: &ClientId, data: Bytes) {
        match Message::decode(&data) {
            Ok(Message::MotorControl(_) | Message::MoveControl(_)) => {
                match self.registry.device_owned_by(client) {
                    Some(device) => self.send_to_device(&device, data),
                    None => debug!(client = %client, "dropping drive frame from non-owner"),
                }
            }
            Ok(message) => {
                debug!(client = %client, kind = ?message.kind(), "dropping unroutable client frame");
            }
            Err(err) => {
                debug!(client = %client, error = %err, "dropping malformed client frame");
            }
        }
    }

    // ---- request handlers ----------------------------------------------

    fn assume_device(&self, client: &ClientId, device: &DeviceId) {
        let previous = self.registry.device_owned_by(client);
        match self.registry.assume(device, client) {
            Ok(info) => {
                // Switching devices implicitly released the old grant.
                if let Some(previous) = previous {
                    if previous != *device {
                        self.send_camera(&previous, false);
                    }
                }
                self.send_camera(device, true);
                self.send_message(
                    client,
                    &ServerMessage::DeviceAssumed {
                        device_id: info.id,
                        name: info.name,
                    },
                );
                self.announce_devices();
            }
            Err(err) => {
                info!(client = %client, device = %device, error = %err, "assume refused");
                self.reply_error(client, &err.to_string());
            }
        }
    }

    fn leave_device(&self, client: &ClientId) {
        let device = match self.registry.device_owned_by(client) {
            Some(device) => device,
            None => {
                self.reply_error(client, "not controlling any device");
                return;
            }
        };
        match self.registry.leave(&device, client) {
            Ok(()) => {
                self.send_camera(&device, false);
                self.announce_devices();
            }
            Err(err) => self.reply_error(client, &err.to_string()),
        }
    }

    fn control(&self, client: &ClientId, action: ControlAction) {
        let device = match self.registry.device_owned_by(client) {
            Some(device) => device,
            None => {
                debug!(client = %client, ?action, "dropping control action from non-owner");
                return;
            }
        };
        let (motor1, motor2) = action.motor_states();
        let frame = Message::motor_control(motor1.as_u8(), motor2.as_u8()).encode();
        self.send_to_device(&device, frame);
    }

    // ---- delivery ------------------------------------------------------

    /// Best-effort frame delivery to a device. An unknown id means the
    /// device is already gone; nothing to do.
    fn send_to_device(&self, id: &DeviceId, data: Bytes) {
        if let Some(link) = self.registry.device_link(id) {
            link.send_binary(data);
        }
    }

    fn send_camera(&self, id: &DeviceId, on: bool) {
        self.send_to_device(id, Message::camera_control(on).encode());
    }

    /// Broadcast the current listing to every client.
    pub fn announce_devices(&self) {
        let message = ServerMessage::DeviceList {
            devices: self.registry.list_devices(),
        };
        match serde_json::to_string(&message) {
            Ok(json) => {
                self.roster.broadcast(&json);
            }
            Err(err) => error!(error = %err, "failed to encode device listing"),
        }
    }

    fn send_message(&self, client: &ClientId, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(json) => {
                self.roster.send_to(client, &json);
            }
            Err(err) => error!(error = %err, "failed to encode server message"),
        }
    }

    fn reply_error(&self, client: &ClientId, message: &str) {
        self.send_message(
            client,
            &ServerMessage::Error {
                message: message.to_string(),
            },
        );
    }
}
