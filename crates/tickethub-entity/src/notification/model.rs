//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::NotificationKind;

/// Reserved id prefix marking a notification as ephemeral-provenance:
/// known only from the live push buffer, with no confirmed persisted record.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// A notification delivered to the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier. Server-assigned for persisted
    /// records; locally synthesized (with [`LOCAL_ID_PREFIX`]) otherwise.
    pub id: String,
    /// Notification kind.
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// When the underlying event occurred.
    pub timestamp: DateTime<Utc>,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub is_read: bool,
    /// Navigable target for click-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Correlated event id for click-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Correlated event title for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,
    /// Free-text justification for moderation notices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Opaque structured payload, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Notification {
    /// Synthesize a fresh local id for a push event that arrived without one.
    pub fn local_id() -> String {
        format!("{}{}", LOCAL_ID_PREFIX, Uuid::new_v4())
    }

    /// Whether this notification has ephemeral provenance (no confirmed
    /// persisted record behind it).
    pub fn is_ephemeral(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }

    /// Whether this notification is unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}
