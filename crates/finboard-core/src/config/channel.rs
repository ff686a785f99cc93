//! Push channel (WebSocket) configuration.

use serde::{Deserialize, Serialize};

/// Settings for the duplex push channel and its reconnection policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// WebSocket endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Initial reconnection backoff delay in milliseconds.
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Maximum reconnection backoff delay in milliseconds.
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
    /// Backoff growth multiplier applied after each failed attempt.
    #[serde(default = "default_multiplier")]
    pub backoff_multiplier: f64,
    /// Buffer size of the inbound event queue.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            backoff_multiplier: default_multiplier(),
            event_buffer_size: default_event_buffer(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:8080/ws/notifications".to_string()
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    30_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_event_buffer() -> usize {
    256
}
