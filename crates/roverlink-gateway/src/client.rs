//! Viewer/operator side of the relay.
//!
//! [`ClientRoster`] tracks every connected client and is the fan-out point
//! for listing broadcasts and per-client replies. [`ClientRole`] adapts one
//! client socket onto the mediator.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use roverlink_core::{ClientId, ConnectionHandle};

use crate::mediator::RelayMediator;
use crate::session::ConnectionRole;

/// One connected client.
#[derive(Debug, Clone)]
struct ClientConnection {
    link: ConnectionHandle,
    connected_at: DateTime<Utc>,
}

/// All currently connected clients.
///
/// Entries are added and removed only by the connection life-cycle; every
/// other caller just sends through the stored handles.
#[derive(Debug, Default)]
pub struct ClientRoster {
    clients: DashMap<ClientId, ClientConnection>,
}

impl ClientRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, id: ClientId, link: ConnectionHandle) {
        self.clients.insert(
            id,
            ClientConnection {
                link,
                connected_at: Utc::now(),
            },
        );
    }

    pub(crate) fn remove(&self, id: &ClientId) -> Option<DateTime<Utc>> {
        self.clients
            .remove(id)
            .map(|(_, connection)| connection.connected_at)
    }

    /// Send a text payload to one client. Returns false when the client is
    /// unknown or its queue rejected the payload.
    pub fn send_to(&self, id: &ClientId, text: &str) -> bool {
        match self.clients.get(id) {
            Some(connection) => connection.link.send_text(text.to_string()),
            None => false,
        }
    }

    /// Send a binary frame to one client.
    pub fn send_binary(&self, id: &ClientId, data: Bytes) -> bool {
        match self.clients.get(id) {
            Some(connection) => connection.link.send_binary(data),
            None => false,
        }
    }

    /// Send a text payload to every client. Returns how many accepted it.
    pub fn broadcast(&self, text: &str) -> usize {
        self.clients
            .iter()
            .filter(|entry| entry.value().link.send_text(text.to_string()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Connection role for sockets accepted on the client path.
pub struct ClientRole {
    mediator: Arc<RelayMediator>,
    client: ClientId,
}

impl ClientRole {
    /// Mint an identity for a freshly accepted client socket.
    pub fn new(mediator: Arc<RelayMediator>) -> Self {
        Self {
            mediator,
            client: ClientId::new(),
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client
    }
}

impl ConnectionRole for ClientRole {
    fn role(&self) -> &'static str {
        "client"
    }

    fn on_connect(&mut self, link: ConnectionHandle) {
        self.mediator.client_connected(self.client.clone(), link);
    }

    fn on_binary(&mut self, data: Bytes) {
        self.mediator.client_frame(&self.client, data);
    }

    fn on_text(&mut self, text: String) {
        self.mediator.client_request(&self.client, &text);
    }

    fn on_disconnect(&mut self) {
        self.mediator.client_disconnected(&self.client);
    }
}
