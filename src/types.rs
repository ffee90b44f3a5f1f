use serde::{Deserialize, Serialize};

/// Opaque, server-assigned identifier of a live connection
pub type ConnectionId = String;

/// Generate a fresh connection id
pub fn new_connection_id() -> ConnectionId {
    ulid::Ulid::new().to_string()
}

/// A joined chat user. Name and room are always stored normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: String,
    pub room: String,
}

/// Chat line as delivered to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    /// Server timestamp in epoch milliseconds
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl ChatMessage {
    /// Stamp a message with the current server time
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Trim and lowercase a user-supplied name or room label
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
