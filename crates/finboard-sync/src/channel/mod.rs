//! Duplex push channel with reconnection and backoff.
//!
//! The channel owns exactly one live WebSocket connection per session. It
//! emits a typed [`ChannelEvent`] stream consumed by the reconciliation
//! engine and publishes [`ConnectionState`] through a watch signal for UI
//! readers. Network failures are never fatal; they degrade the client to
//! pull-only operation while the channel retries with bounded exponential
//! backoff.

pub mod backoff;
mod task;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use finboard_core::config::channel::ChannelConfig;
use finboard_entity::{ClientMessage, ConnectionState, PushMessage};

use self::task::ChannelTask;

/// Events emitted by the channel toward the reconciliation engine.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A parsed inbound push message.
    Message(PushMessage),
    /// The connection state changed.
    StateChanged(ConnectionState),
}

/// Commands accepted by the channel task.
#[derive(Debug)]
pub(crate) enum ChannelCommand {
    /// Open (or keep open) the connection for this session token.
    Connect { token: String },
    /// Close the connection and stop retrying.
    Disconnect,
    /// Swap the credential without touching the live connection.
    RotateToken { token: String },
    /// Best-effort outbound message; dropped when disconnected.
    Send(ClientMessage),
}

/// Handle for sending best-effort outbound messages over the channel.
///
/// Cheap to clone; sending while disconnected silently drops the message
/// (the authoritative write always travels over the pull client).
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    cmd_tx: mpsc::Sender<ChannelCommand>,
}

impl ChannelHandle {
    /// Send a best-effort message to the server.
    pub async fn send(&self, message: ClientMessage) {
        if self.cmd_tx.send(ChannelCommand::Send(message)).await.is_err() {
            debug!("push channel task gone; outbound message dropped");
        }
    }
}

/// The push channel owning the WebSocket connection task.
///
/// Dropping the channel stops the task and closes any live connection.
#[derive(Debug)]
pub struct PushChannel {
    cmd_tx: mpsc::Sender<ChannelCommand>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl PushChannel {
    /// Spawn the connection task. Inbound events are delivered on `events`.
    pub fn spawn(config: ChannelConfig, events: mpsc::Sender<ChannelEvent>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        tokio::spawn(ChannelTask::new(config, cmd_rx, events, state_tx).run());
        Self { cmd_tx, state_rx }
    }

    /// Connect with the given session token.
    ///
    /// Concurrent connect requests for the same token are deduplicated by
    /// the task; at most one live connection exists per session.
    pub async fn connect(&self, token: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(ChannelCommand::Connect {
                token: token.into(),
            })
            .await;
    }

    /// Close the connection and stop reconnection attempts.
    pub async fn disconnect(&self) {
        let _ = self.cmd_tx.send(ChannelCommand::Disconnect).await;
    }

    /// Swap the session credential without reconnecting.
    pub async fn rotate_token(&self, token: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(ChannelCommand::RotateToken {
                token: token.into(),
            })
            .await;
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch receiver for connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Handle for best-effort outbound sends.
    pub fn handle(&self) -> ChannelHandle {
        ChannelHandle {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}
