//! Lean wire types for platform updates.
//!
//! Only the fields this library consumes are modeled; everything else in
//! the platform's schema is ignored on deserialization. The offset
//! strategy in particular reads nothing but `update_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform-assigned update sequence number.
///
/// Monotonically non-decreasing within one bot's stream, not unique
/// across bots. Serializes as a bare integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UpdateId(pub i64);

impl UpdateId {
    /// The "no offset yet" sentinel the platform reads as "fetch from the
    /// beginning of the backlog". Real update ids start above zero.
    pub const BACKLOG: UpdateId = UpdateId(0);

    /// The offset that acknowledges this update: `id + 1`.
    pub fn successor(self) -> UpdateId {
        UpdateId(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for UpdateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Absent only in malformed platform output; the offset strategy
    /// rejects such records.
    pub update_id: Option<UpdateId>,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix timestamp, seconds.
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub video: Option<Video>,
}

impl Message {
    /// Message date as a UTC timestamp, if the platform sent one in range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    /// Duration in seconds.
    pub duration: i64,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}
