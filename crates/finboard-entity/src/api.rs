//! REST response shapes consumed by the pull client.

use serde::{Deserialize, Serialize};

use crate::notification::Notification;

/// Full authoritative listing returned by `GET /notifications`.
///
/// Used to resynchronize after connection gaps or failed optimistic
/// mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Most recent notifications, newest first.
    pub items: Vec<Notification>,
    /// Global unread count, which may exceed the number of items in the
    /// returned page.
    pub unread_count: u64,
}

impl Snapshot {
    /// An empty snapshot, used when clearing state at sign-out.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            unread_count: 0,
        }
    }
}

/// Response of `GET /notifications/unread-count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    /// Current unread count.
    pub count: u64,
}

/// Response of `POST /notifications/mark-all-read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    /// Number of notifications the server transitioned to read.
    pub count: u64,
}
