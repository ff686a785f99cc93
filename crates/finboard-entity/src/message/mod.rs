//! Push channel message type definitions.

pub mod client;
pub mod push;

pub use client::ClientMessage;
pub use push::PushMessage;
