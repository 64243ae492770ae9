use crate::{
    error::NudgeError,
    message::{IncomingMessage, OutgoingMessage},
    user::{UserId, UserRecord},
    weather::{WeatherError, WeatherSummary},
};
use async_trait::async_trait;

/// Messaging Channel trait: the transport.
///
/// Every messaging platform implements this trait to receive events and
/// send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, NudgeError>;

    /// Send a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), NudgeError>;

    /// Acknowledge an inline keyboard press, optionally with a toast text.
    async fn answer_callback(&self, _query_id: &str, _text: &str) -> Result<(), NudgeError> {
        Ok(())
    }

    /// Download the bytes of a file previously referenced by an incoming message.
    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, NudgeError> {
        Err(NudgeError::Channel(format!(
            "{} cannot fetch file {file_id}",
            self.name()
        )))
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), NudgeError>;
}

/// Persistence of registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or overwrite the record for `id`.
    async fn upsert_user(&self, id: UserId, name: &str, age: i64) -> Result<(), NudgeError>;

    /// All stored users, ordered by id.
    async fn list_users(&self) -> Result<Vec<UserRecord>, NudgeError>;
}

/// Geocoding + current weather lookup by city name.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn lookup(&self, city: &str) -> Result<WeatherSummary, WeatherError>;
}
