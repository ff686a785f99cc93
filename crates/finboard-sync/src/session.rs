//! Session lifecycle controller.
//!
//! Owns the engine's lifetime tied to authentication state: sign-in builds
//! the store, transports, and engine; sign-out closes the channel, stops
//! the engine, and clears the store. A token refresh rotates the credential
//! in place and is deliberately not treated as sign-out/sign-in.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::sync::{RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use finboard_core::config::AppConfig;
use finboard_core::{AppError, AppResult};
use finboard_entity::ConnectionState;

use crate::channel::PushChannel;
use crate::engine::{AlertDecision, EngineHandle, EngineInput, ReconcileEngine};
use crate::pull::{HttpPullClient, PullTransport};
use crate::store::NotificationStore;
use crate::token::SessionToken;

struct ActiveSession {
    token: SessionToken,
    channel: PushChannel,
    engine: EngineHandle,
    store: Arc<RwLock<NotificationStore>>,
    alerts_rx: Option<mpsc::Receiver<AlertDecision>>,
    engine_task: JoinHandle<()>,
    forward_task: JoinHandle<()>,
}

/// Creates and tears down the synchronization aggregate per authenticated
/// session. One store and one live channel connection exist per session;
/// nothing is persisted across sessions.
pub struct SessionController {
    config: AppConfig,
    session: Option<ActiveSession>,
}

impl SessionController {
    /// Create a controller in the signed-out state.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Whether a session is currently active.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Start a session: fetch the initial snapshot, then open the push
    /// channel.
    pub async fn sign_in(&mut self, token: impl Into<String>) -> AppResult<()> {
        let token = SessionToken::new(token);
        let pull = Arc::new(HttpPullClient::new(
            &self.config.api,
            &self.config.sync,
            token.clone(),
        )?);
        self.sign_in_with(token, pull).await
    }

    /// Start a session with an externally supplied pull transport.
    ///
    /// This is the seam used by tests and by embedders with their own HTTP
    /// stack.
    pub async fn sign_in_with(
        &mut self,
        token: SessionToken,
        pull: Arc<dyn PullTransport>,
    ) -> AppResult<()> {
        if self.session.is_some() {
            return Err(AppError::session("a session is already active"));
        }

        let store = Arc::new(RwLock::new(NotificationStore::new(
            self.config.sync.collection_bound,
        )));
        let (alerts_tx, alerts_rx) = mpsc::channel(self.config.sync.alert_buffer_size);
        let (input_tx, input_rx) = mpsc::channel(self.config.sync.input_buffer_size);
        let (events_tx, mut events_rx) = mpsc::channel(self.config.channel.event_buffer_size);

        let channel = PushChannel::spawn(self.config.channel.clone(), events_tx);
        let alive = Arc::new(AtomicBool::new(true));

        let engine = ReconcileEngine::new(
            &self.config.sync,
            store.clone(),
            pull,
            channel.handle(),
            alerts_tx,
            input_rx,
            alive.clone(),
        );
        let engine_task = tokio::spawn(engine.run());

        // Bridge channel events into the engine's single input queue.
        let bridge_tx = input_tx.clone();
        let forward_task = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if bridge_tx.send(EngineInput::Channel(event)).await.is_err() {
                    break;
                }
            }
        });

        let engine_handle = EngineHandle::new(input_tx, alive);
        engine_handle.resync().await;
        channel.connect(token.get()).await;

        info!("notification session started");
        self.session = Some(ActiveSession {
            token,
            channel,
            engine: engine_handle,
            store,
            alerts_rx: Some(alerts_rx),
            engine_task,
            forward_task,
        });
        Ok(())
    }

    /// End the session: close the channel, stop the engine, clear state.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            session.channel.disconnect().await;
            session.engine.shutdown().await;
            let _ = session.engine_task.await;
            session.forward_task.abort();
            info!("notification session ended");
        }
    }

    /// Swap the session credential after a token refresh.
    ///
    /// The live connection and local state are untouched; only a future
    /// reconnect or request picks up the new credential.
    pub async fn rotate_token(&self, token: impl Into<String>) -> AppResult<()> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AppError::session("no active session"))?;
        let token = token.into();
        session.token.rotate(token.clone());
        session.channel.rotate_token(token).await;
        Ok(())
    }

    /// Shared read access to the store, while signed in.
    pub fn store(&self) -> Option<Arc<RwLock<NotificationStore>>> {
        self.session.as_ref().map(|s| s.store.clone())
    }

    /// Handle for user-intent commands, while signed in.
    pub fn engine(&self) -> Option<EngineHandle> {
        self.session.as_ref().map(|s| s.engine.clone())
    }

    /// Current push channel state; `Disconnected` while signed out.
    pub fn connection_state(&self) -> ConnectionState {
        self.session
            .as_ref()
            .map(|s| s.channel.state())
            .unwrap_or(ConnectionState::Disconnected)
    }

    /// Watch receiver for connection state, while signed in.
    pub fn watch_connection(&self) -> Option<watch::Receiver<ConnectionState>> {
        self.session.as_ref().map(|s| s.channel.watch_state())
    }

    /// Take the alert decision queue. Yields `Some` exactly once per
    /// session.
    pub fn take_alerts(&mut self) -> Option<mpsc::Receiver<AlertDecision>> {
        self.session.as_mut().and_then(|s| s.alerts_rx.take())
    }
}
