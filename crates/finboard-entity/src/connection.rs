//! Push channel connection state.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the push channel connection.
///
/// Owned by the channel; the reconciliation engine and UI only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No live connection; live updates are unavailable.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The duplex stream is established.
    Connected,
}

impl ConnectionState {
    /// Whether live push delivery is currently available.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Connected)
    }
}
