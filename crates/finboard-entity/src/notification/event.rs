//! Notification event kind enumeration.

use serde::{Deserialize, Serialize};

/// The domain event that produced a notification.
///
/// This is a closed enumeration matching the server's wire contract; a
/// notification's event kind never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A requested report finished generating.
    ReportReady,
    /// An outgoing payment failed.
    PaymentFailed,
    /// An incoming payment settled.
    PaymentReceived,
    /// An account balance dropped below its configured threshold.
    LowBalance,
    /// A security-relevant event (new device, password change, etc.).
    SecurityAlert,
    /// An invoice passed its due date unpaid.
    InvoiceOverdue,
    /// A periodic statement became available.
    StatementAvailable,
    /// Generic account activity.
    AccountActivity,
}

impl NotificationEvent {
    /// Wire representation of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReportReady => "report_ready",
            Self::PaymentFailed => "payment_failed",
            Self::PaymentReceived => "payment_received",
            Self::LowBalance => "low_balance",
            Self::SecurityAlert => "security_alert",
            Self::InvoiceOverdue => "invoice_overdue",
            Self::StatementAvailable => "statement_available",
            Self::AccountActivity => "account_activity",
        }
    }
}
