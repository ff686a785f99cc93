//! # finboard-entity
//!
//! Domain model and wire types for the Finboard notification client:
//!
//! - [`notification::Notification`] and the closed event-kind enumeration
//! - Push channel message unions ([`message::PushMessage`],
//!   [`message::ClientMessage`])
//! - REST response shapes ([`api::Snapshot`] and friends)
//! - [`alert::AlertLevel`] and [`connection::ConnectionState`]

pub mod alert;
pub mod api;
pub mod connection;
pub mod message;
pub mod notification;

pub use alert::AlertLevel;
pub use connection::ConnectionState;
pub use message::{ClientMessage, PushMessage};
pub use notification::{Notification, NotificationEvent};
