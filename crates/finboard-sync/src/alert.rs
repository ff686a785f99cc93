//! Alert policy: decides how loudly an arriving notification interrupts.

use chrono::{DateTime, Utc};

use finboard_core::config::sync::SyncConfig;
use finboard_entity::{AlertLevel, Notification};

/// Pure classification of incoming notifications into alert levels.
///
/// - Critical notifications always produce a persistent alert.
/// - Non-critical notifications created within the recency window produce a
///   transient alert.
/// - Anything older arrived via snapshot or backfill and must not
///   retroactively interrupt the user.
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    transient_window_seconds: i64,
}

impl AlertPolicy {
    /// Build the policy from engine configuration.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            transient_window_seconds: config.transient_window_seconds,
        }
    }

    /// Decide the alert level for a notification observed at `now`.
    ///
    /// Has no side effects.
    pub fn decide(&self, notification: &Notification, now: DateTime<Utc>) -> AlertLevel {
        if notification.is_critical {
            return AlertLevel::Persistent;
        }
        if notification.age_seconds(now) <= self.transient_window_seconds {
            return AlertLevel::Transient;
        }
        AlertLevel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use finboard_entity::NotificationEvent;

    fn policy() -> AlertPolicy {
        AlertPolicy::new(&SyncConfig::default())
    }

    fn notification(is_critical: bool, age_seconds: i64, now: DateTime<Utc>) -> Notification {
        Notification {
            id: "ntf_1".to_string(),
            event: NotificationEvent::SecurityAlert,
            title: "title".to_string(),
            message: "message".to_string(),
            is_read: false,
            is_critical,
            created_at: now - Duration::seconds(age_seconds),
            action_url: None,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn critical_recent_is_persistent() {
        let now = Utc::now();
        assert_eq!(
            policy().decide(&notification(true, 5, now), now),
            AlertLevel::Persistent
        );
    }

    #[test]
    fn critical_stale_is_still_persistent() {
        let now = Utc::now();
        assert_eq!(
            policy().decide(&notification(true, 3600, now), now),
            AlertLevel::Persistent
        );
    }

    #[test]
    fn non_critical_recent_is_transient() {
        let now = Utc::now();
        assert_eq!(
            policy().decide(&notification(false, 5, now), now),
            AlertLevel::Transient
        );
    }

    #[test]
    fn non_critical_stale_is_silent() {
        let now = Utc::now();
        assert_eq!(
            policy().decide(&notification(false, 3600, now), now),
            AlertLevel::None
        );
    }

    #[test]
    fn future_timestamp_counts_as_fresh() {
        // Clock skew can put created_at slightly ahead of the client.
        let now = Utc::now();
        assert_eq!(
            policy().decide(&notification(false, -30, now), now),
            AlertLevel::Transient
        );
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let now = Utc::now();
        assert_eq!(
            policy().decide(&notification(false, 60, now), now),
            AlertLevel::Transient
        );
        assert_eq!(
            policy().decide(&notification(false, 61, now), now),
            AlertLevel::None
        );
    }
}
