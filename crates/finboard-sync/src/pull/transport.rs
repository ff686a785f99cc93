//! Pull transport trait.

use async_trait::async_trait;

use finboard_core::AppResult;
use finboard_entity::api::Snapshot;

/// Typed request layer over the notification REST surface.
///
/// This is a pure transport: no caching and no retries. Retry policy lives
/// in the reconciliation engine, which recovers from failed writes by
/// re-fetching a full snapshot.
#[async_trait]
pub trait PullTransport: Send + Sync {
    /// Fetch the authoritative listing plus global unread count.
    async fn fetch_snapshot(&self) -> AppResult<Snapshot>;

    /// Fetch only the global unread count.
    async fn fetch_unread_count(&self) -> AppResult<u64>;

    /// Mark a single notification as read.
    async fn mark_read(&self, id: &str) -> AppResult<()>;

    /// Mark every notification as read, returning how many transitioned.
    async fn mark_all_read(&self) -> AppResult<u64>;

    /// Delete a single notification.
    async fn delete(&self, id: &str) -> AppResult<()>;
}
