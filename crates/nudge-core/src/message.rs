use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming event from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    pub sender_id: UserId,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    pub payload: Payload,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl IncomingMessage {
    /// Build a message stamped with a fresh id and the current time.
    pub fn new(channel: &str, sender_id: UserId, payload: Payload) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            sender_id,
            sender_name: None,
            payload,
            timestamp: Utc::now(),
            reply_target: Some(sender_id.direct_target()),
        }
    }
}

/// What the user actually sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Plain text, including `/commands`.
    Text(String),
    /// A photo; `file_id` refers to the largest available size.
    Photo {
        file_id: String,
        caption: Option<String>,
    },
    /// A press on an inline keyboard button.
    Callback { query_id: String, data: String },
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    #[serde(default)]
    pub markup: Option<InlineKeyboard>,
}

impl OutgoingMessage {
    /// Plain text addressed to `target`.
    pub fn text(target: Option<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_target: target,
            markup: None,
        }
    }

    pub fn with_markup(mut self, markup: InlineKeyboard) -> Self {
        self.markup = Some(markup);
        self
    }
}

/// Inline keyboard attached to a message, laid out in rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

/// A single inline button that posts `callback_data` back when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}
