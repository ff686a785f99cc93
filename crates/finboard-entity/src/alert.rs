//! Alert level classification.

use serde::{Deserialize, Serialize};

/// How loudly an incoming notification should interrupt the user.
///
/// Ordered from quietest to loudest so callers can compare levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Do not interrupt; the item only appears in the notification list.
    None,
    /// Auto-dismissing toast.
    Transient,
    /// Requires explicit dismissal; carries an action button when the
    /// notification has a deep-link.
    Persistent,
}

impl AlertLevel {
    /// Whether this level produces any visible interruption.
    pub fn is_audible(&self) -> bool {
        *self > Self::None
    }
}
