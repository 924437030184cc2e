//! Click-through navigation targets.

use serde::{Deserialize, Serialize};

use tickethub_entity::notification::{Notification, NotificationKind};

/// A navigation target yielded by a notification click-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// An explicit navigable target carried by the notification.
    Link {
        /// The target.
        href: String,
    },
    /// The detail view of a correlated event.
    Event {
        /// The event id.
        event_id: String,
    },
    /// The user's tickets view.
    Tickets,
    /// The refunds view.
    Refunds,
    /// The notification inbox fallback.
    Inbox,
}

impl Route {
    /// Resolve the navigation target for a notification.
    ///
    /// Strict priority: explicit `link` > event-id route > kind default >
    /// inbox fallback. Surfaces that carry their own action handler apply
    /// it before consulting this resolution.
    pub fn resolve(notification: &Notification) -> Self {
        if let Some(link) = &notification.link {
            return Self::Link { href: link.clone() };
        }
        if let Some(event_id) = &notification.event_id {
            return Self::Event {
                event_id: event_id.clone(),
            };
        }
        match notification.kind {
            NotificationKind::TicketConfirmed | NotificationKind::WaitlistApproved => Self::Tickets,
            NotificationKind::RefundRequested => Self::Refunds,
            _ => Self::Inbox,
        }
    }
}
