//! Shared helpers for Roverlink integration tests.
//!
//! [`TestRelay`] serves a real relay on an ephemeral loopback port; the
//! socket helpers speak to it over actual WebSocket connections so the
//! tests cover the full accept/upgrade/pump path, not just the mediator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use roverlink_core::config::Config;
use roverlink_gateway::{RelayMediator, RelayServer};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// WebSocket client stream type used by the tests.
pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A relay serving on an ephemeral loopback port for one test.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub mediator: Arc<RelayMediator>,
    server_task: tokio::task::JoinHandle<()>,
}

impl TestRelay {
    /// Bind `127.0.0.1:0` and serve the given configuration in the
    /// background until the relay is dropped.
    pub async fn start(config: Config) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = RelayServer::new(&config);
        let mediator = server.mediator();
        let server_task = tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        Self {
            addr,
            mediator,
            server_task,
        }
    }

    /// Relay with default configuration.
    pub async fn start_default() -> Self {
        Self::start(Config::default()).await
    }

    pub fn client_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn device_url(&self) -> String {
        format!("ws://{}/wsc", self.addr)
    }

    pub fn health_url(&self) -> String {
        format!("http://{}/health", self.addr)
    }

    /// Open a client-class connection.
    pub async fn connect_client(&self) -> Socket {
        connect(&self.client_url()).await
    }

    /// Open a device-class connection.
    pub async fn connect_device(&self) -> Socket {
        connect(&self.device_url()).await
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.server_task.abort();
    }
}

/// Connect a WebSocket to the given URL.
pub async fn connect(url: &str) -> Socket {
    let (socket, _response) = connect_async(url).await.expect("websocket connect");
    socket
}

/// Send one JSON value as a text frame.
pub async fn send_json(socket: &mut Socket, value: &serde_json::Value) {
    socket
        .send(Message::Text(value.to_string()))
        .await
        .expect("websocket send");
}

/// Send one binary frame.
pub async fn send_binary(socket: &mut Socket, data: Vec<u8>) {
    socket
        .send(Message::Binary(data))
        .await
        .expect("websocket send");
}

/// Receive the next text frame as JSON.
///
/// Binary frames arriving first are skipped; listing broadcasts and relayed
/// telemetry interleave freely on a client connection.
pub async fn next_json(socket: &mut Socket) -> serde_json::Value {
    loop {
        match recv(socket).await {
            Message::Text(text) => return serde_json::from_str(&text).expect("json payload"),
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame while waiting for text: {other:?}"),
        }
    }
}

/// Receive the next binary frame, skipping text frames.
pub async fn next_binary(socket: &mut Socket) -> Vec<u8> {
    loop {
        match recv(socket).await {
            Message::Binary(data) => return data,
            Message::Text(_) | Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame while waiting for binary: {other:?}"),
        }
    }
}

async fn recv(socket: &mut Socket) -> Message {
    tokio::time::timeout(RECV_TIMEOUT, socket.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("connection closed")
        .expect("websocket error")
}
