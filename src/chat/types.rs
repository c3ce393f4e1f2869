use crate::api::types::HistoryMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One entry of the conversation, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Spoken rendition of a bot answer, when the backend produced one
    pub audio_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            audio_url: None,
            timestamp: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>, audio_url: Option<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            audio_url,
            timestamp: Utc::now(),
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio_url.is_some()
    }
}

impl From<HistoryMessage> for ChatMessage {
    fn from(message: HistoryMessage) -> Self {
        Self {
            role: message.role,
            content: message.content,
            audio_url: message.audio_url,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_bot_message_with_audio() {
        let message = ChatMessage::bot("Yes, 80% chance", Some("https://x/a.mp3".to_string()));
        assert_eq!(message.role, Role::Bot);
        assert!(message.has_audio());
    }
}
