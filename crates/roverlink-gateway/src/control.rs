//! Device side of the relay.
//!
//! A socket accepted on the device path is registered with the mediator on
//! connect and unregistered on disconnect; everything it sends in between
//! is treated as binary telemetry frames.

use std::sync::Arc;

use bytes::Bytes;
use roverlink_core::{ConnectionHandle, DeviceId};
use tracing::debug;

use crate::mediator::RelayMediator;
use crate::session::ConnectionRole;

/// Connection role for sockets accepted on the device path.
pub struct DeviceRole {
    mediator: Arc<RelayMediator>,
    device: Option<DeviceId>,
}

impl DeviceRole {
    pub fn new(mediator: Arc<RelayMediator>) -> Self {
        Self {
            mediator,
            device: None,
        }
    }

    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device.as_ref()
    }
}

impl ConnectionRole for DeviceRole {
    fn role(&self) -> &'static str {
        "device"
    }

    fn on_connect(&mut self, link: ConnectionHandle) {
        self.device = Some(self.mediator.device_connected(link));
    }

    fn on_binary(&mut self, data: Bytes) {
        if let Some(device) = &self.device {
            self.mediator.device_frame(device, data);
        }
    }

    fn on_text(&mut self, _text: String) {
        // devices speak the binary protocol only
        debug!(device = ?self.device, "ignoring text payload from device");
    }

    fn on_disconnect(&mut self) {
        if let Some(device) = self.device.take() {
            self.mediator.device_disconnected(&device);
        }
    }
}
