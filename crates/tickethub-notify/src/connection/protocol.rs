//! Push channel frame definitions and ingestion normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use tickethub_entity::notification::{Notification, NotificationKind};

/// Frames sent by the server over the push channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    /// A notification push carrying a raw record.
    Notification(PushPayload),
    /// Server keepalive.
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
}

/// Frames sent by the client over the push channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Keepalive response.
    Pong {
        /// Echoed server timestamp.
        timestamp: i64,
    },
}

/// Raw notification record as it arrives on the push channel.
///
/// Every field the client needs may be absent or unknown on the wire;
/// ingestion defaults rather than rejects so no user-visible event is
/// dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    /// Server-assigned id, when the record is already persisted.
    #[serde(default)]
    pub id: Option<String>,
    /// Notification kind; unknown wire values fall back to `info`.
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: NotificationKind,
    /// Notification title.
    #[serde(default)]
    pub title: Option<String>,
    /// Notification body text.
    #[serde(default)]
    pub message: Option<String>,
    /// When the underlying event occurred.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Navigable target.
    #[serde(default)]
    pub link: Option<String>,
    /// Correlated event id.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Correlated event title.
    #[serde(default)]
    pub event_title: Option<String>,
    /// Moderation free text.
    #[serde(default)]
    pub reason: Option<String>,
    /// Opaque passthrough payload.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl PushPayload {
    /// Normalize a raw push record into a [`Notification`].
    ///
    /// Synthesizes a local id when none is present (marking the record as
    /// ephemeral-provenance), defaults the timestamp to `now`, and always
    /// ingests as unread.
    pub fn into_notification(self, now: DateTime<Utc>) -> Notification {
        Notification {
            id: self.id.unwrap_or_else(Notification::local_id),
            kind: self.kind,
            title: self.title.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or(now),
            is_read: false,
            link: self.link,
            event_id: self.event_id,
            event_title: self.event_title,
            reason: self.reason,
            metadata: self.metadata,
        }
    }
}

/// Deserialize a notification kind, falling back to the default on
/// unknown wire values instead of failing the whole frame.
fn lenient_kind<'de, D>(deserializer: D) -> Result<NotificationKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
