//! Inbound push message type definitions.

use serde::{Deserialize, Serialize};

use crate::notification::Notification;

/// Messages sent by the server over the push channel.
///
/// The wire format is JSON tagged by `type`. The channel may deliver the
/// same message more than once; every variant is designed to merge
/// idempotently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// Sent once after the duplex stream is established. Carries the
    /// authoritative unread count and any notifications that arrived while
    /// the client was away.
    ConnectionEstablished {
        /// Authoritative unread count at connection time.
        unread_count: u64,
        /// Notifications pending delivery, newest first.
        #[serde(default)]
        pending_notifications: Vec<Notification>,
    },
    /// A notification was just created.
    NewNotification {
        /// The new notification.
        notification: Notification,
    },
    /// Authoritative unread count update.
    UnreadCount {
        /// Current unread count.
        count: i64,
    },
    /// The server confirms a specific notification was read, possibly from
    /// another tab or device.
    NotificationRead {
        /// The notification that was read.
        notification_id: String,
        /// Authoritative unread count, when the server includes one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unread_count: Option<u64>,
    },
    /// Every notification was marked read.
    AllMarkedRead,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connection_established() {
        let json = r#"{
            "type": "connection_established",
            "unread_count": 7,
            "pending_notifications": [{
                "id": "ntf_10",
                "event": "low_balance",
                "title": "Low balance",
                "message": "Operating account below $1,000.",
                "is_read": false,
                "is_critical": false,
                "created_at": "2026-03-01T11:59:00Z",
                "metadata": {}
            }]
        }"#;

        match serde_json::from_str::<PushMessage>(json).unwrap() {
            PushMessage::ConnectionEstablished {
                unread_count,
                pending_notifications,
            } => {
                assert_eq!(unread_count, 7);
                assert_eq!(pending_notifications.len(), 1);
                assert_eq!(pending_notifications[0].id, "ntf_10");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn parses_notification_read_without_count() {
        let json = r#"{"type": "notification_read", "notification_id": "ntf_11"}"#;
        match serde_json::from_str::<PushMessage>(json).unwrap() {
            PushMessage::NotificationRead {
                notification_id,
                unread_count,
            } => {
                assert_eq!(notification_id, "ntf_11");
                assert!(unread_count.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn parses_all_marked_read() {
        let json = r#"{"type": "all_marked_read"}"#;
        assert!(matches!(
            serde_json::from_str::<PushMessage>(json).unwrap(),
            PushMessage::AllMarkedRead
        ));
    }

    #[test]
    fn unread_count_may_be_negative_on_the_wire() {
        // The merge rule floors at zero; the wire type itself must not
        // reject a misbehaving server.
        let json = r#"{"type": "unread_count", "count": -3}"#;
        match serde_json::from_str::<PushMessage>(json).unwrap() {
            PushMessage::UnreadCount { count } => assert_eq!(count, -3),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
