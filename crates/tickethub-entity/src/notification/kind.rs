//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// Kind of a notification, driving iconography and click-through defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A generic success notice.
    Success,
    /// A generic warning notice.
    Warning,
    /// A generic informational notice. The legacy wire value `"event"`
    /// maps here as well.
    #[serde(alias = "event")]
    Info,
    /// A generic error notice.
    Error,
    /// An event the user held tickets for was deleted.
    EventDeleted,
    /// A ticket purchase or registration was confirmed.
    TicketConfirmed,
    /// A refund was requested or processed.
    RefundRequested,
    /// A waitlist spot was approved.
    WaitlistApproved,
}

impl NotificationKind {
    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Error => "error",
            Self::EventDeleted => "event_deleted",
            Self::TicketConfirmed => "ticket_confirmed",
            Self::RefundRequested => "refund_requested",
            Self::WaitlistApproved => "waitlist_approved",
        }
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
