//! Filter types for notification list queries.

use serde::{Deserialize, Serialize};

/// Filter parameters for the notification history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationFilter {
    /// Only return unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Only return notifications of this kind (wire value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl NotificationFilter {
    /// Filter for unread notifications only.
    pub fn unread() -> Self {
        Self {
            unread_only: true,
            kind: None,
        }
    }

    /// Filter by notification kind.
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            unread_only: false,
            kind: Some(kind.into()),
        }
    }

    /// Render the filter as query-string pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.unread_only {
            pairs.push(("unread_only", "true".to_string()));
        }
        if let Some(kind) = &self.kind {
            pairs.push(("type", kind.clone()));
        }
        pairs
    }
}
