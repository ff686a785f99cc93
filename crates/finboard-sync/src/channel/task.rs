//! Push channel connection task.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use finboard_core::config::channel::ChannelConfig;
use finboard_entity::{ConnectionState, PushMessage};

use super::backoff::Backoff;
use super::{ChannelCommand, ChannelEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a connection session ended.
enum SessionEnd {
    /// `Disconnect` was requested; stay idle until the next connect.
    Disconnected,
    /// The command channel closed; the owning session is gone.
    Shutdown,
}

/// Why a single live connection ended.
enum DriveEnd {
    /// The socket dropped or errored; retry with backoff.
    Dropped,
    /// `Disconnect` was requested.
    Disconnect,
    /// The command channel closed.
    Shutdown,
}

/// Single task owning the WebSocket connection lifecycle.
///
/// Commands arrive on one queue, so connect/disconnect churn is serialized:
/// a second `Connect` for the same token while a connection is live is a
/// no-op rather than a second socket.
pub(crate) struct ChannelTask {
    config: ChannelConfig,
    cmd_rx: mpsc::Receiver<ChannelCommand>,
    events: mpsc::Sender<ChannelEvent>,
    state_tx: watch::Sender<ConnectionState>,
    token: Option<String>,
}

impl ChannelTask {
    pub(crate) fn new(
        config: ChannelConfig,
        cmd_rx: mpsc::Receiver<ChannelCommand>,
        events: mpsc::Sender<ChannelEvent>,
        state_tx: watch::Sender<ConnectionState>,
    ) -> Self {
        Self {
            config,
            cmd_rx,
            events,
            state_tx,
            token: None,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            match self.cmd_rx.recv().await {
                None => break,
                Some(ChannelCommand::Connect { token }) => {
                    self.token = Some(token);
                    if let SessionEnd::Shutdown = self.run_session().await {
                        break;
                    }
                }
                Some(ChannelCommand::Disconnect) => {
                    // Already idle.
                }
                Some(ChannelCommand::RotateToken { token }) => {
                    if self.token.is_some() {
                        self.token = Some(token);
                    }
                }
                Some(ChannelCommand::Send(_)) => {
                    debug!("outbound message dropped; push channel not connected");
                }
            }
        }
        debug!("push channel task ended");
    }

    /// Connect-and-retry loop for one signed-in session.
    async fn run_session(&mut self) -> SessionEnd {
        let mut backoff = Backoff::new(&self.config);
        loop {
            self.set_state(ConnectionState::Connecting).await;
            let token = self.token.clone().unwrap_or_default();
            let url = format!("{}?token={}", self.config.url, token);

            match connect_async(url.as_str()).await {
                Ok((ws, _)) => {
                    backoff.reset();
                    info!("push channel connected");
                    self.set_state(ConnectionState::Connected).await;
                    match self.drive(ws).await {
                        DriveEnd::Dropped => {
                            warn!("push channel connection lost");
                            self.set_state(ConnectionState::Disconnected).await;
                        }
                        DriveEnd::Disconnect => {
                            self.set_state(ConnectionState::Disconnected).await;
                            return SessionEnd::Disconnected;
                        }
                        DriveEnd::Shutdown => {
                            self.set_state(ConnectionState::Disconnected).await;
                            return SessionEnd::Shutdown;
                        }
                    }
                }
                Err(e) if is_auth_rejection(&e) => {
                    // An invalid session is never retried here; teardown
                    // belongs to the lifecycle controller.
                    warn!(error = %e, "push channel session rejected; giving up");
                    self.set_state(ConnectionState::Disconnected).await;
                    return SessionEnd::Disconnected;
                }
                Err(e) => {
                    warn!(error = %e, "push channel connect failed");
                    self.set_state(ConnectionState::Disconnected).await;
                }
            }

            // Wait out the backoff delay, still honoring commands.
            let delay = backoff.next_delay();
            debug!(delay_ms = delay.as_millis() as u64, "push channel retry scheduled");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                cmd = self.cmd_rx.recv() => match cmd {
                    None => return SessionEnd::Shutdown,
                    Some(ChannelCommand::Disconnect) => return SessionEnd::Disconnected,
                    Some(ChannelCommand::Connect { token })
                    | Some(ChannelCommand::RotateToken { token }) => {
                        self.token = Some(token);
                    }
                    Some(ChannelCommand::Send(_)) => {
                        debug!("outbound message dropped; push channel not connected");
                    }
                }
            }
        }
    }

    /// Drive one live connection until it drops or is told to stop.
    async fn drive(&mut self, ws: WsStream) -> DriveEnd {
        let (mut sink, mut stream) = ws.split();
        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<PushMessage>(text.as_str()) {
                            Ok(msg) => {
                                if self
                                    .events
                                    .send(ChannelEvent::Message(msg))
                                    .await
                                    .is_err()
                                {
                                    return DriveEnd::Shutdown;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "dropping unparseable push message");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            return DriveEnd::Dropped;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return DriveEnd::Dropped,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "push channel read error");
                        return DriveEnd::Dropped;
                    }
                },
                cmd = self.cmd_rx.recv() => match cmd {
                    None => {
                        let _ = sink.send(Message::Close(None)).await;
                        return DriveEnd::Shutdown;
                    }
                    Some(ChannelCommand::Disconnect) => {
                        let _ = sink.send(Message::Close(None)).await;
                        return DriveEnd::Disconnect;
                    }
                    Some(ChannelCommand::Connect { token }) => {
                        // Duplicate connect for the live session; dedup.
                        if self.token.as_deref() != Some(token.as_str()) {
                            self.token = Some(token);
                        }
                    }
                    Some(ChannelCommand::RotateToken { token }) => {
                        // Applies on the next reconnect; the live socket stays.
                        self.token = Some(token);
                    }
                    Some(ChannelCommand::Send(msg)) => {
                        match serde_json::to_string(&msg) {
                            Ok(text) => {
                                if sink.send(Message::text(text)).await.is_err() {
                                    return DriveEnd::Dropped;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "failed to encode outbound message");
                            }
                        }
                    }
                }
            }
        }
    }

    async fn set_state(&self, state: ConnectionState) {
        if *self.state_tx.borrow() == state {
            return;
        }
        let _ = self.state_tx.send(state);
        let _ = self.events.send(ChannelEvent::StateChanged(state)).await;
    }
}

/// Whether the server refused the handshake for an invalid session.
fn is_auth_rejection(error: &WsError) -> bool {
    match error {
        WsError::Http(response) => matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ),
        _ => false,
    }
}
