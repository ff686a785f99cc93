//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::NotificationEvent;

/// A notification delivered to the dashboard user.
///
/// `id`, `event`, and `created_at` are immutable once created; only
/// `is_read` may transition, and only from `false` to `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Opaque identifier, unique per tenant.
    pub id: String,
    /// Event kind that triggered this notification.
    pub event: NotificationEvent,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub is_read: bool,
    /// Whether this notification requires persistent user attention.
    #[serde(default)]
    pub is_critical: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Optional deep-link the user can follow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    /// Additional opaque structured data.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Notification {
    /// Check if the notification has not yet been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Age of the notification relative to `now`, in whole seconds.
    ///
    /// Clock skew can make `created_at` sit slightly in the future; that
    /// is reported as zero age rather than a negative value.
    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "id": "ntf_01",
            "event": "payment_failed",
            "title": "Payment failed",
            "message": "Transfer to ACME Corp was declined.",
            "is_read": false,
            "is_critical": true,
            "created_at": "2026-03-01T12:00:00Z",
            "action_url": "/payments/123",
            "metadata": {"payment_id": "pay_123"}
        }"#;

        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.id, "ntf_01");
        assert_eq!(n.event, NotificationEvent::PaymentFailed);
        assert!(n.is_critical);
        assert!(n.is_unread());
        assert_eq!(n.action_url.as_deref(), Some("/payments/123"));
        assert_eq!(n.metadata["payment_id"], "pay_123");
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "id": "ntf_02",
            "event": "report_ready",
            "title": "Report ready",
            "message": "Your Q1 report is ready.",
            "created_at": "2026-03-01T12:00:00Z"
        }"#;

        let n: Notification = serde_json::from_str(json).unwrap();
        assert!(!n.is_read);
        assert!(!n.is_critical);
        assert!(n.action_url.is_none());
        assert!(n.metadata.is_empty());
    }

    #[test]
    fn age_is_floored_at_zero() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let n = Notification {
            id: "ntf_03".to_string(),
            event: NotificationEvent::LowBalance,
            title: "Low balance".to_string(),
            message: "Balance below threshold.".to_string(),
            is_read: false,
            is_critical: false,
            created_at: created,
            action_url: None,
            metadata: serde_json::Map::new(),
        };

        let before = created - chrono::Duration::seconds(30);
        assert_eq!(n.age_seconds(before), 0);
        let after = created + chrono::Duration::seconds(90);
        assert_eq!(n.age_seconds(after), 90);
    }
}
