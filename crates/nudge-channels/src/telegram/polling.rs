//! Long-polling update loop and Channel trait implementation.

use super::types::{TgFile, TgResponse, TgUpdate};
use super::{TelegramChannel, API_ROOT};
use async_trait::async_trait;
use nudge_core::{
    error::NudgeError,
    message::{IncomingMessage, OutgoingMessage, Payload},
    traits::Channel,
    user::UserId,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, NudgeError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_users = self.config.allowed_users.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let Some(incoming) = parse_update(update, &allowed_users) else {
                        continue;
                    };

                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), NudgeError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| NudgeError::Channel("no reply_target on outgoing message".into()))?;

        let chat_id: i64 = chat_id_str.parse().map_err(|e| {
            NudgeError::Channel(format!("invalid telegram chat_id '{chat_id_str}': {e}"))
        })?;

        self.send_text(chat_id, &message.text, message.markup.as_ref())
            .await
    }

    async fn answer_callback(&self, query_id: &str, text: &str) -> Result<(), NudgeError> {
        self.answer_callback_query(query_id, text).await
    }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, NudgeError> {
        download_telegram_file(&self.client, &self.base_url, &self.config.bot_token, file_id)
            .await
    }

    async fn stop(&self) -> Result<(), NudgeError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Turn a raw update into an incoming event.
///
/// Returns `None` for update kinds the bot does not handle, updates without
/// a sender, and senders outside a non-empty allow-list.
pub(crate) fn parse_update(update: TgUpdate, allowed_users: &[i64]) -> Option<IncomingMessage> {
    let (user, chat_id, payload) = if let Some(query) = update.callback_query {
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id);
        let payload = Payload::Callback {
            query_id: query.id,
            data: query.data.unwrap_or_default(),
        };
        (query.from, chat_id, payload)
    } else {
        let msg = update.message?;
        let payload = if let Some(text) = msg.text {
            Payload::Text(text)
        } else if let Some(photos) = msg.photo {
            // Telegram sends multiple sizes; the last is the largest.
            let largest = photos.into_iter().next_back()?;
            debug!(
                "telegram: photo {}x{} from chat {}",
                largest.width, largest.height, msg.chat.id
            );
            Payload::Photo {
                file_id: largest.file_id,
                caption: msg.caption,
            }
        } else {
            return None;
        };
        (msg.from?, msg.chat.id, payload)
    };

    // Auth check.
    if !allowed_users.is_empty() && !allowed_users.contains(&user.id) {
        warn!("ignoring message from unauthorized user {}", user.id);
        return None;
    }

    let mut incoming = IncomingMessage::new("telegram", UserId(user.id), payload);
    incoming.sender_name = Some(user.display_name());
    incoming.reply_target = Some(chat_id.to_string());
    Some(incoming)
}

/// Download a file from Telegram servers by file_id.
async fn download_telegram_file(
    client: &reqwest::Client,
    base_url: &str,
    bot_token: &str,
    file_id: &str,
) -> Result<Vec<u8>, NudgeError> {
    // Step 1: getFile to obtain file_path.
    let url = format!("{base_url}/getFile?file_id={file_id}");
    let resp: TgResponse<TgFile> = client
        .get(&url)
        .send()
        .await
        .map_err(|e| NudgeError::Channel(format!("telegram getFile failed: {e}")))?
        .json()
        .await
        .map_err(|e| NudgeError::Channel(format!("telegram getFile parse failed: {e}")))?;

    let file_path = resp
        .result
        .and_then(|f| f.file_path)
        .ok_or_else(|| NudgeError::Channel("telegram getFile returned no file_path".into()))?;

    // Step 2: Download the actual file bytes.
    let download_url = format!("{API_ROOT}/file/bot{bot_token}/{file_path}");
    let resp = client
        .get(&download_url)
        .send()
        .await
        .map_err(|e| NudgeError::Channel(format!("telegram file download failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(NudgeError::Channel(format!(
            "telegram file download failed ({})",
            resp.status()
        )));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| NudgeError::Channel(format!("telegram file read failed: {e}")))?;

    Ok(bytes.to_vec())
}
