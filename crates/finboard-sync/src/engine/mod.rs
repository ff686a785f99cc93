//! Reconciliation engine: merges push events and pull responses into the
//! notification store.
//!
//! The engine is the only writer to the store. It consumes a single input
//! queue (channel events, user commands, control inputs) and processes one
//! input fully before the next, so store mutation is serialized. Push and
//! pull still race against each other across the two transports; every
//! merge rule here is commutative with respect to unread-count adjustments
//! (floor at zero, server absolute values override) and idempotent with
//! respect to repeated delivery.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use finboard_core::config::sync::SyncConfig;
use finboard_entity::{AlertLevel, ClientMessage, ConnectionState, Notification, PushMessage};

use crate::alert::AlertPolicy;
use crate::channel::{ChannelEvent, ChannelHandle};
use crate::pull::PullTransport;
use crate::store::{MarkReadOutcome, NotificationStore};

/// Inputs consumed by the engine, in arrival order.
#[derive(Debug)]
pub enum EngineInput {
    /// An event from the push channel.
    Channel(ChannelEvent),
    /// A user-intent command from the UI.
    Command(UserCommand),
    /// Force a full snapshot re-fetch.
    Resync,
    /// Tear down: clear the store and stop the engine.
    Shutdown,
}

/// User-intent commands, applied optimistically before the server confirms.
#[derive(Debug, Clone)]
pub enum UserCommand {
    /// Mark a single notification as read.
    MarkRead(String),
    /// Mark every notification as read.
    MarkAllRead,
    /// Delete a single notification.
    Delete(String),
}

/// An alert the UI should surface for a just-arrived notification.
#[derive(Debug, Clone)]
pub struct AlertDecision {
    /// The notification that triggered the alert.
    pub notification: Notification,
    /// How loudly to interrupt. Always above [`AlertLevel::None`].
    pub level: AlertLevel,
}

/// Cloneable handle for feeding the engine from UI code.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    input_tx: mpsc::Sender<EngineInput>,
    alive: Arc<AtomicBool>,
}

impl EngineHandle {
    pub(crate) fn new(input_tx: mpsc::Sender<EngineInput>, alive: Arc<AtomicBool>) -> Self {
        Self { input_tx, alive }
    }

    /// Mark a single notification as read (optimistic).
    pub async fn mark_read(&self, id: impl Into<String>) {
        self.send(EngineInput::Command(UserCommand::MarkRead(id.into())))
            .await;
    }

    /// Mark every notification as read (optimistic).
    pub async fn mark_all_read(&self) {
        self.send(EngineInput::Command(UserCommand::MarkAllRead)).await;
    }

    /// Delete a notification (optimistic).
    pub async fn delete(&self, id: impl Into<String>) {
        self.send(EngineInput::Command(UserCommand::Delete(id.into())))
            .await;
    }

    /// Force a full snapshot re-fetch.
    pub async fn resync(&self) {
        self.send(EngineInput::Resync).await;
    }

    /// Tear the engine down.
    ///
    /// The liveness flag flips immediately, so inputs already queued ahead
    /// of the shutdown can no longer mutate the store.
    pub async fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.send(EngineInput::Shutdown).await;
    }

    async fn send(&self, input: EngineInput) {
        if self.input_tx.send(input).await.is_err() {
            debug!("engine gone; input dropped");
        }
    }
}

/// The reconciliation engine.
pub struct ReconcileEngine {
    store: Arc<RwLock<NotificationStore>>,
    pull: Arc<dyn PullTransport>,
    channel: ChannelHandle,
    policy: AlertPolicy,
    alerts: mpsc::Sender<AlertDecision>,
    input_rx: mpsc::Receiver<EngineInput>,
    alive: Arc<AtomicBool>,
    was_connected: bool,
}

impl ReconcileEngine {
    /// Assemble an engine over an existing store and transports.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &SyncConfig,
        store: Arc<RwLock<NotificationStore>>,
        pull: Arc<dyn PullTransport>,
        channel: ChannelHandle,
        alerts: mpsc::Sender<AlertDecision>,
        input_rx: mpsc::Receiver<EngineInput>,
        alive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            pull,
            channel,
            policy: AlertPolicy::new(config),
            alerts,
            input_rx,
            alive,
            was_connected: false,
        }
    }

    /// Run until shutdown or until all input senders are dropped.
    pub async fn run(mut self) {
        while self.tick().await {}
        debug!("reconciliation engine stopped");
    }

    /// Process a single queued input. Returns `false` once the engine is
    /// done. Public so tests and custom loops can drive the engine
    /// deterministically.
    pub async fn tick(&mut self) -> bool {
        let Some(input) = self.input_rx.recv().await else {
            return false;
        };
        match input {
            EngineInput::Shutdown => {
                self.alive.store(false, Ordering::SeqCst);
                self.store.write().await.clear();
                info!("engine shut down; store cleared");
                false
            }
            _ if !self.is_alive() => {
                // Teardown already initiated; stale inputs must not mutate.
                true
            }
            EngineInput::Channel(ChannelEvent::Message(msg)) => {
                self.apply_message(msg).await;
                true
            }
            EngineInput::Channel(ChannelEvent::StateChanged(state)) => {
                self.handle_state_change(state).await;
                true
            }
            EngineInput::Command(cmd) => {
                self.apply_command(cmd).await;
                true
            }
            EngineInput::Resync => {
                self.resync().await;
                true
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Merge one inbound push message into the store.
    async fn apply_message(&mut self, msg: PushMessage) {
        match msg {
            PushMessage::ConnectionEstablished {
                unread_count,
                pending_notifications,
            } => {
                debug!(
                    unread_count,
                    pending = pending_notifications.len(),
                    "connection established; applying authoritative state"
                );
                let inserted = {
                    let mut store = self.store.write().await;
                    store.set_unread_count(unread_count);
                    let mut inserted = Vec::new();
                    // Reverse so the newest pending item ends up frontmost.
                    for n in pending_notifications.into_iter().rev() {
                        if store.upsert_front(n.clone()) {
                            inserted.push(n);
                        }
                    }
                    inserted
                };
                for notification in inserted {
                    self.emit_alert(notification).await;
                }
            }
            PushMessage::NewNotification { notification } => {
                let inserted = {
                    let mut store = self.store.write().await;
                    if store.contains(&notification.id) {
                        // At-least-once channel; duplicates are absorbed.
                        debug!(id = %notification.id, "duplicate notification ignored");
                        false
                    } else {
                        if notification.is_unread() {
                            store.increment_unread();
                        }
                        store.insert_front(notification.clone())
                    }
                };
                if inserted {
                    self.emit_alert(notification).await;
                }
            }
            PushMessage::UnreadCount { count } => {
                // Authoritative; overrides any locally computed delta.
                self.store
                    .write()
                    .await
                    .set_unread_count(count.max(0) as u64);
            }
            PushMessage::NotificationRead {
                notification_id,
                unread_count,
            } => {
                let mut store = self.store.write().await;
                let outcome = store.mark_read(&notification_id);
                match unread_count {
                    Some(count) => store.set_unread_count(count),
                    None => match outcome {
                        // Only adjust for a real transition; an echo of our
                        // own optimistic mark-read is already accounted for.
                        MarkReadOutcome::Flipped | MarkReadOutcome::NotFound => {
                            store.saturating_decrement_unread();
                        }
                        MarkReadOutcome::AlreadyRead => {}
                    },
                }
            }
            PushMessage::AllMarkedRead => {
                self.store.write().await.mark_all_read();
            }
        }
    }

    /// React to connection state transitions.
    ///
    /// The push channel offers no delivery guarantee across a disconnect
    /// window, so a reconnect is treated like a first connection: local
    /// state is rebuilt from a fresh snapshot.
    async fn handle_state_change(&mut self, state: ConnectionState) {
        if !state.is_live() {
            // Pull-only mode; the UI reads the state from the watch
            // signal and shows its "live updates unavailable" hint.
            return;
        }
        let reconnected = self.was_connected;
        self.was_connected = true;
        if reconnected {
            info!("push channel reconnected; forcing resynchronization");
            self.resync().await;
        }
    }

    /// Apply a user command optimistically, then confirm over the pull
    /// client. A failed confirmation is recovered by replacing local state
    /// with a fresh snapshot rather than computing an inverse mutation.
    async fn apply_command(&mut self, cmd: UserCommand) {
        match cmd {
            UserCommand::MarkRead(id) => {
                {
                    let mut store = self.store.write().await;
                    if store.mark_read(&id) == MarkReadOutcome::Flipped {
                        store.saturating_decrement_unread();
                    }
                }
                self.channel
                    .send(ClientMessage::MarkRead {
                        notification_id: id.clone(),
                    })
                    .await;
                if let Err(e) = self.pull.mark_read(&id).await {
                    self.recover(&e, "mark-read").await;
                }
            }
            UserCommand::MarkAllRead => {
                self.store.write().await.mark_all_read();
                self.channel.send(ClientMessage::MarkAllRead).await;
                if let Err(e) = self.pull.mark_all_read().await {
                    self.recover(&e, "mark-all-read").await;
                }
            }
            UserCommand::Delete(id) => {
                {
                    let mut store = self.store.write().await;
                    if let Some(removed) = store.remove(&id) {
                        if removed.is_unread() {
                            store.saturating_decrement_unread();
                        }
                    }
                }
                if let Err(e) = self.pull.delete(&id).await {
                    self.recover(&e, "delete").await;
                }
            }
        }
    }

    /// Recovery path for a failed optimistic command.
    async fn recover(&self, error: &finboard_core::AppError, op: &str) {
        if error.is_auth_failure() {
            // Session invalid: never retried here; the lifecycle
            // controller owns teardown.
            warn!(error = %error, op, "session rejected; deferring to lifecycle controller");
            return;
        }
        warn!(error = %error, op, "optimistic command failed; resynchronizing");
        self.resync().await;
    }

    /// Replace collection and counter wholesale from a fresh snapshot.
    async fn resync(&self) {
        match self.pull.fetch_snapshot().await {
            Ok(snapshot) => {
                if !self.is_alive() {
                    return;
                }
                debug!(
                    items = snapshot.items.len(),
                    unread = snapshot.unread_count,
                    "applying snapshot"
                );
                self.store
                    .write()
                    .await
                    .replace_snapshot(snapshot.items, snapshot.unread_count);
            }
            Err(e) if e.is_auth_failure() => {
                warn!(error = %e, "snapshot rejected; deferring to lifecycle controller");
            }
            Err(e) => {
                // Keep serving current state; the next push or command
                // will trigger another attempt.
                warn!(error = %e, "snapshot fetch failed; keeping current state");
            }
        }
    }

    /// Run the alert policy and forward audible decisions to the UI.
    async fn emit_alert(&self, notification: Notification) {
        let level = self.policy.decide(&notification, Utc::now());
        if !level.is_audible() {
            return;
        }
        let decision = AlertDecision {
            notification,
            level,
        };
        if let Err(e) = self.alerts.try_send(decision) {
            debug!(error = %e, "alert queue full or closed; decision dropped");
        }
    }
}
