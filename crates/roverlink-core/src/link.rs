//! Outbound connection handles.
//!
//! The relay core never touches sockets directly. Each connection task hands
//! out a [`ConnectionHandle`] backed by a bounded queue it drains itself;
//! everything else sends through the handle. Sends are fire-and-forget:
//! telemetry and video are real-time and lossy, so when the queue is full or
//! the connection is gone the payload is dropped and counted, never retried.

use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default depth of a per-connection outbound queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 256;

/// One queued outbound payload.
///
/// Protocol frames travel as binary; the client control protocol as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Binary(Bytes),
    Text(String),
}

/// Cloneable sender half of a connection's outbound queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: mpsc::Sender<Outbound>,
    dropped: Arc<AtomicU64>,
}

impl ConnectionHandle {
    /// Create a handle together with the receiver its connection task drains.
    pub fn channel(depth: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(depth);
        let handle = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (handle, rx)
    }

    /// Queue a binary payload. Returns false if the payload was dropped.
    pub fn send_binary(&self, bytes: Bytes) -> bool {
        self.send(Outbound::Binary(bytes))
    }

    /// Queue a text payload. Returns false if the payload was dropped.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.send(Outbound::Text(text.into()))
    }

    fn send(&self, outbound: Outbound) -> bool {
        match self.tx.try_send(outbound) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// True once the receiving connection task has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Number of payloads dropped on this connection so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
