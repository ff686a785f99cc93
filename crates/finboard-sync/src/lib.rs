//! # finboard-sync
//!
//! Client-side notification synchronization engine for Finboard. Keeps a
//! local view of a user's notifications consistent with server-side truth
//! delivered through two independent, racing channels:
//!
//! - A duplex WebSocket push channel with reconnection and backoff
//! - A typed REST pull client used for snapshots and authoritative writes
//!
//! The reconciliation engine is the only writer to the notification store;
//! UI layers read the store and send user-intent commands back through the
//! engine as optimistic mutations with resync-on-failure recovery.

pub mod alert;
pub mod channel;
pub mod engine;
pub mod pull;
pub mod session;
pub mod store;
pub mod token;

pub use alert::AlertPolicy;
pub use channel::{ChannelEvent, ChannelHandle, PushChannel};
pub use engine::{AlertDecision, EngineHandle, EngineInput, ReconcileEngine, UserCommand};
pub use pull::{HttpPullClient, PullTransport};
pub use session::SessionController;
pub use store::NotificationStore;
pub use token::SessionToken;
