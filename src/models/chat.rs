//! Chat message models.

use serde::{Deserialize, Serialize};

/// A message delivered on the `chat-message` topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_avatar: Option<String>,
    pub content: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Payload of the `send-message` topic. The transport stamps id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_avatar: Option<String>,
    pub content: String,
}

impl OutgoingMessage {
    pub fn stamp(self, id: String, timestamp: String) -> ChatMessage {
        ChatMessage {
            id,
            sender: self.sender,
            sender_id: self.sender_id,
            sender_avatar: self.sender_avatar,
            content: self.content,
            timestamp,
        }
    }
}

/// Request body for posting to the chat room.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}
