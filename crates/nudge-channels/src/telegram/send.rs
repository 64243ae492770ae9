//! Message sending: text, inline keyboards, callback answers, and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use nudge_core::{error::NudgeError, message::InlineKeyboard};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Telegram's per-message text limit in bytes.
const MAX_MESSAGE_LEN: usize = 4096;

/// Encode an inline keyboard as a Bot API `reply_markup` object.
pub(crate) fn reply_markup(keyboard: &InlineKeyboard) -> Value {
    let rows: Vec<Value> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| json!({ "text": b.text, "callback_data": b.callback_data }))
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

/// Build a `sendMessage` body.
///
/// Text goes out without `parse_mode`: echoed input, names and city names
/// reach the chat exactly as typed.
pub(crate) fn message_body(chat_id: i64, text: &str, markup: Option<&InlineKeyboard>) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": text,
    });
    if let Some(kb) = markup {
        body["reply_markup"] = reply_markup(kb);
    }
    body
}

impl TelegramChannel {
    /// Send a text message to a specific chat.
    ///
    /// Long texts are split; the keyboard, if any, rides on the last chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboard>,
    ) -> Result<(), NudgeError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);
        let url = format!("{}/sendMessage", self.base_url);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let body = message_body(chat_id, chunk, markup.filter(|_| i == last));

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| NudgeError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(NudgeError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Answer a callback query so the client stops its loading spinner.
    pub(crate) async fn answer_callback_query(
        &self,
        query_id: &str,
        text: &str,
    ) -> Result<(), NudgeError> {
        let url = format!("{}/answerCallbackQuery", self.base_url);
        let mut body = json!({ "callback_query_id": query_id });
        if !text.is_empty() {
            body["text"] = json!(text);
        }

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NudgeError::Channel(format!("telegram answerCallbackQuery failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(NudgeError::Channel(format!(
                "telegram answerCallbackQuery failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = json!({
            "commands": [
                { "command": "start", "description": "Register: name and age" },
                { "command": "weather", "description": "Current weather in a city" },
                { "command": "users", "description": "List registered users" },
                { "command": "menu", "description": "Show a choice menu" },
                { "command": "echo", "description": "Repeat your text" },
                { "command": "help", "description": "Show available commands" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}
