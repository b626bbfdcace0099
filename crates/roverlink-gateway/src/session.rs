//! Shared WebSocket session plumbing.
//!
//! Each accepted socket is driven by [`pump`], which owns the raw
//! send/receive halves and hands the connection's life-cycle events to a
//! [`ConnectionRole`]. The role never touches the socket: its only way to
//! reply is the [`ConnectionHandle`] it receives in `on_connect`, which
//! keeps role logic synchronous and testable without a network.

use std::net::SocketAddr;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use roverlink_core::{ConnectionHandle, Outbound};
use tracing::{debug, info, warn};

/// Behavior of one side of the relay, bound to a single connection.
pub trait ConnectionRole: Send {
    /// Short label used in connection logs.
    fn role(&self) -> &'static str;

    /// Called once before any payload, with the handle for outbound sends.
    fn on_connect(&mut self, link: ConnectionHandle);

    /// A binary frame arrived on the socket.
    fn on_binary(&mut self, data: Bytes);

    /// A text payload arrived on the socket.
    fn on_text(&mut self, text: String);

    /// The socket is gone; always called exactly once.
    fn on_disconnect(&mut self);
}

/// Drive a socket until either side hangs up.
///
/// Outbound traffic queued on the role's [`ConnectionHandle`] is written to
/// the socket; inbound frames are dispatched to the role. When the peer
/// closes, the write side fails, or every handle clone is dropped, the pump
/// stops and `on_disconnect` fires.
pub async fn pump<R: ConnectionRole>(
    socket: WebSocket,
    mut role: R,
    queue_depth: usize,
    remote: SocketAddr,
) {
    let (link, mut outbound) = ConnectionHandle::channel(queue_depth);
    role.on_connect(link);
    info!(role = role.role(), %remote, "connection open");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            queued = outbound.recv() => {
                let message = match queued {
                    Some(Outbound::Binary(bytes)) => WsMessage::Binary(bytes.to_vec()),
                    Some(Outbound::Text(text)) => WsMessage::Text(text),
                    // every handle clone dropped, nothing left to write
                    None => break,
                };
                if sink.send(message).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(WsMessage::Binary(data))) => role.on_binary(Bytes::from(data)),
                    Some(Ok(WsMessage::Text(text))) => role.on_text(text),
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // ping/pong handled by axum
                    }
                    Some(Err(err)) => {
                        warn!(role = role.role(), %remote, error = %err, "socket error");
                        break;
                    }
                }
            }
        }
    }

    role.on_disconnect();
    debug!(role = role.role(), %remote, "connection closed");
}
