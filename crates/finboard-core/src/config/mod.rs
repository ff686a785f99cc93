//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod api;
pub mod channel;
pub mod logging;
pub mod sync;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::channel::ChannelConfig;
use self::logging::LoggingConfig;
use self::sync::SyncConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notification REST API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Push channel (WebSocket) settings.
    #[serde(default)]
    pub channel: ChannelConfig,
    /// Synchronization engine settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            channel: ChannelConfig::default(),
            sync: SyncConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the application configuration.
    ///
    /// Merges the named configuration file (without extension, e.g.
    /// `config/default`) with environment variables prefixed with
    /// `FINBOARD__`.
    pub fn load(name: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("FINBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_documented_bounds() {
        let config = AppConfig::default();
        assert_eq!(config.sync.collection_bound, 20);
        assert_eq!(config.sync.transient_window_seconds, 60);
        assert_eq!(config.channel.initial_backoff_ms, 500);
        assert!(config.channel.max_backoff_ms >= config.channel.initial_backoff_ms);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }
}
