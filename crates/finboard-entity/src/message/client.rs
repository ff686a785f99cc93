//! Outbound client message type definitions.

use serde::{Deserialize, Serialize};

/// Messages sent by the client over the push channel.
///
/// These are best-effort signals for other tabs of the same session; the
/// authoritative write always travels over the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Mark a single notification as read.
    MarkRead {
        /// Notification ID.
        notification_id: String,
    },
    /// Mark every notification as read.
    MarkAllRead,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_tagged() {
        let msg = ClientMessage::MarkRead {
            notification_id: "ntf_42".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "mark_read");
        assert_eq!(json["notification_id"], "ntf_42");

        let json = serde_json::to_value(&ClientMessage::MarkAllRead).unwrap();
        assert_eq!(json["type"], "mark_all_read");
    }
}
