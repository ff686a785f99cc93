//! Bounded exponential backoff for push channel reconnection.

use std::time::Duration;

use finboard_core::config::channel::ChannelConfig;

/// Reconnection delay schedule: grows geometrically from the initial delay
/// and is capped at the maximum.
#[derive(Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    current: Duration,
}

impl Backoff {
    /// Build a schedule from channel configuration.
    pub fn new(config: &ChannelConfig) -> Self {
        let initial = Duration::from_millis(config.initial_backoff_ms);
        Self {
            initial,
            max: Duration::from_millis(config.max_backoff_ms),
            multiplier: config.backoff_multiplier.max(1.0),
            current: initial,
        }
    }

    /// The delay to wait before the next attempt. Each call grows the
    /// schedule, capped at the maximum.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let grown = self.current.as_millis() as f64 * self.multiplier;
        self.current = Duration::from_millis(grown as u64).min(self.max);
        delay
    }

    /// Reset the schedule after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChannelConfig {
        ChannelConfig {
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
            backoff_multiplier: 2.0,
            ..ChannelConfig::default()
        }
    }

    #[test]
    fn grows_geometrically_and_caps() {
        let mut backoff = Backoff::new(&config());
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(), Duration::from_millis(800));
        assert_eq!(backoff.next_delay(), Duration::from_millis(1000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn reset_returns_to_initial() {
        let mut backoff = Backoff::new(&config());
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
    }

    #[test]
    fn multiplier_below_one_is_clamped() {
        let mut cfg = config();
        cfg.backoff_multiplier = 0.5;
        let mut backoff = Backoff::new(&cfg);
        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert!(backoff.next_delay() >= Duration::from_millis(100));
    }
}
