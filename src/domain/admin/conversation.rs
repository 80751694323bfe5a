//! Conversation types as exposed to admin views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EmotionLevel;

/// Whether a conversation is still accepting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Open,
    Closed,
}

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub role: MessageRole,
    #[serde(default)]
    pub meditation_title: Option<String>,
    #[serde(default)]
    pub meditation_url: Option<String>,
    #[serde(default)]
    pub image_card_url: Option<String>,
}

/// A user conversation, optionally annotated with its owner for admin listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub status: ConversationStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_card_url: Option<String>,
    #[serde(default)]
    pub meditation_url: Option<String>,
    #[serde(default)]
    pub cloud_url: Option<String>,
    #[serde(default)]
    pub meditation_listened: Option<bool>,
    #[serde(default)]
    pub meditation_title: Option<String>,
    #[serde(default)]
    pub user_emotions: Vec<EmotionLevel>,
    #[serde(default)]
    pub is_new: Option<bool>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl Conversation {
    /// Title for listings; falls back to the conversation id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Number of messages authored by the end user.
    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }

    /// Timestamp of the most recent message, if any.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.iter().map(|m| m.created_at).max()
    }
}
