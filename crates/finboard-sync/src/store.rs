//! Authoritative in-memory notification collection and unread counter.

use finboard_entity::Notification;

/// Result of a mark-read mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The entry transitioned from unread to read.
    Flipped,
    /// The entry was already read; no change.
    AlreadyRead,
    /// No entry with that id is held locally.
    NotFound,
}

/// The authoritative in-memory collection of notifications plus the unread
/// counter.
///
/// Invariants:
/// - No two entries share an id (upsert-by-id semantics).
/// - Entries are ordered most-recently-observed first and bounded to the
///   configured size.
/// - The unread counter never goes negative. It is tracked independently of
///   the collection because the server's global count may exceed the
///   locally-held page.
///
/// All mutation must go through the reconciliation engine; readers only see
/// immutable views.
#[derive(Debug)]
pub struct NotificationStore {
    items: Vec<Notification>,
    bound: usize,
    unread_count: u64,
}

impl NotificationStore {
    /// Create an empty store bounded to `bound` entries.
    pub fn new(bound: usize) -> Self {
        Self {
            items: Vec::with_capacity(bound.min(64)),
            bound,
            unread_count: 0,
        }
    }

    /// The held notifications, most recently observed first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Number of held notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a notification by id.
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Whether an entry with this id is held.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    /// The tracked unread count.
    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    /// Insert a notification at the front of the collection.
    ///
    /// Returns `false` without mutating if an entry with the same id is
    /// already held (duplicate-delivery tolerance).
    pub fn insert_front(&mut self, notification: Notification) -> bool {
        if self.contains(&notification.id) {
            return false;
        }
        self.items.insert(0, notification);
        self.items.truncate(self.bound);
        true
    }

    /// Upsert by id, inserting at the front when the id is new.
    ///
    /// For an existing entry only the read flag is merged, and only in the
    /// unread-to-read direction; identity fields never change and the entry
    /// keeps its position. Returns `true` when a new entry was inserted.
    pub fn upsert_front(&mut self, notification: Notification) -> bool {
        if let Some(existing) = self.items.iter_mut().find(|n| n.id == notification.id) {
            if notification.is_read {
                existing.is_read = true;
            }
            return false;
        }
        self.items.insert(0, notification);
        self.items.truncate(self.bound);
        true
    }

    /// Remove an entry by id, returning it when present.
    ///
    /// Does not touch the unread counter; the caller decides how the removal
    /// affects it.
    pub fn remove(&mut self, id: &str) -> Option<Notification> {
        let pos = self.items.iter().position(|n| n.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Mark a single entry as read.
    pub fn mark_read(&mut self, id: &str) -> MarkReadOutcome {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) if n.is_read => MarkReadOutcome::AlreadyRead,
            Some(n) => {
                n.is_read = true;
                MarkReadOutcome::Flipped
            }
            None => MarkReadOutcome::NotFound,
        }
    }

    /// Mark every entry as read and zero the unread counter.
    ///
    /// Returns the number of entries that transitioned.
    pub fn mark_all_read(&mut self) -> u64 {
        let mut flipped = 0;
        for n in &mut self.items {
            if !n.is_read {
                n.is_read = true;
                flipped += 1;
            }
        }
        self.unread_count = 0;
        flipped
    }

    /// Set the unread counter to a server-reported absolute value.
    pub fn set_unread_count(&mut self, count: u64) {
        self.unread_count = count;
    }

    /// Increment the unread counter by one.
    pub fn increment_unread(&mut self) {
        self.unread_count += 1;
    }

    /// Decrement the unread counter by one, floored at zero.
    pub fn saturating_decrement_unread(&mut self) {
        self.unread_count = self.unread_count.saturating_sub(1);
    }

    /// Replace the collection and counter wholesale from a snapshot.
    ///
    /// Duplicate ids in the snapshot keep their first (newest) occurrence.
    pub fn replace_snapshot(&mut self, items: Vec<Notification>, unread_count: u64) {
        self.items.clear();
        for n in items {
            if !self.contains(&n.id) {
                self.items.push(n);
            }
            if self.items.len() == self.bound {
                break;
            }
        }
        self.unread_count = unread_count;
    }

    /// Discard all state at session teardown.
    pub fn clear(&mut self) {
        self.items.clear();
        self.unread_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use finboard_entity::NotificationEvent;

    fn notification(id: &str, is_read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            event: NotificationEvent::AccountActivity,
            title: format!("Notification {id}"),
            message: "body".to_string(),
            is_read,
            is_critical: false,
            created_at: Utc::now(),
            action_url: None,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn insert_front_rejects_duplicates() {
        let mut store = NotificationStore::new(5);
        assert!(store.insert_front(notification("a", false)));
        assert!(!store.insert_front(notification("a", false)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_front_truncates_to_bound() {
        let mut store = NotificationStore::new(3);
        for id in ["a", "b", "c", "d"] {
            store.insert_front(notification(id, false));
        }
        let ids: Vec<&str> = store.items().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["d", "c", "b"]);
    }

    #[test]
    fn upsert_merges_read_flag_forward_only() {
        let mut store = NotificationStore::new(5);
        store.insert_front(notification("a", false));
        assert!(!store.upsert_front(notification("a", true)));
        assert!(store.get("a").unwrap().is_read);

        // A stale unread copy never reverts the flag.
        assert!(!store.upsert_front(notification("a", false)));
        assert!(store.get("a").unwrap().is_read);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut store = NotificationStore::new(5);
        store.insert_front(notification("a", false));
        assert_eq!(store.mark_read("a"), MarkReadOutcome::Flipped);
        assert_eq!(store.mark_read("a"), MarkReadOutcome::AlreadyRead);
        assert_eq!(store.mark_read("missing"), MarkReadOutcome::NotFound);
    }

    #[test]
    fn unread_counter_never_goes_negative() {
        let mut store = NotificationStore::new(5);
        store.saturating_decrement_unread();
        assert_eq!(store.unread_count(), 0);
        store.set_unread_count(2);
        store.saturating_decrement_unread();
        store.saturating_decrement_unread();
        store.saturating_decrement_unread();
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn mark_all_read_flips_everything_and_zeroes_counter() {
        let mut store = NotificationStore::new(5);
        store.insert_front(notification("a", false));
        store.insert_front(notification("b", true));
        store.insert_front(notification("c", false));
        store.set_unread_count(7);

        assert_eq!(store.mark_all_read(), 2);
        assert!(store.items().iter().all(|n| n.is_read));
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn replace_snapshot_dedups_and_bounds() {
        let mut store = NotificationStore::new(2);
        store.insert_front(notification("old", false));

        store.replace_snapshot(
            vec![
                notification("a", false),
                notification("a", true),
                notification("b", false),
                notification("c", false),
            ],
            9,
        );

        let ids: Vec<&str> = store.items().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(!store.get("a").unwrap().is_read, "first occurrence wins");
        assert_eq!(store.unread_count(), 9);
    }

    #[test]
    fn clear_discards_everything() {
        let mut store = NotificationStore::new(5);
        store.insert_front(notification("a", false));
        store.set_unread_count(3);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.unread_count(), 0);
    }
}
