//! Synchronization engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for the notification store and reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum number of notifications held in the live collection.
    #[serde(default = "default_collection_bound")]
    pub collection_bound: usize,
    /// Recency window in seconds within which a non-critical notification
    /// still produces a transient alert.
    #[serde(default = "default_transient_window")]
    pub transient_window_seconds: i64,
    /// Page size requested when fetching a snapshot.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Buffer size of the engine input queue (channel events + commands).
    #[serde(default = "default_input_buffer")]
    pub input_buffer_size: usize,
    /// Buffer size of the outbound alert decision queue.
    #[serde(default = "default_alert_buffer")]
    pub alert_buffer_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection_bound: default_collection_bound(),
            transient_window_seconds: default_transient_window(),
            page_size: default_page_size(),
            input_buffer_size: default_input_buffer(),
            alert_buffer_size: default_alert_buffer(),
        }
    }
}

fn default_collection_bound() -> usize {
    20
}

fn default_transient_window() -> i64 {
    60
}

fn default_page_size() -> usize {
    20
}

fn default_input_buffer() -> usize {
    64
}

fn default_alert_buffer() -> usize {
    32
}
