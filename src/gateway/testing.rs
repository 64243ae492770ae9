//! In-memory collaborators for gateway tests.

use async_trait::async_trait;
use nudge_core::{
    error::NudgeError,
    message::{IncomingMessage, OutgoingMessage, Payload},
    traits::{Channel, UserStore, WeatherLookup},
    user::{UserId, UserRecord},
    weather::{WeatherError, WeatherSummary},
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Records everything sent; sends to ids in `failing` return an error.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<OutgoingMessage>>,
    pub answered: Mutex<Vec<(String, String)>>,
    pub files: Mutex<BTreeMap<String, Vec<u8>>>,
    pub failing: Mutex<HashSet<String>>,
    /// Latency added to every send.
    pub latency: Mutex<Duration>,
}

impl RecordingChannel {
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }

    pub fn texts_to(&self, target: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.reply_target.as_deref() == Some(target))
            .map(|m| m.text)
            .collect()
    }

    pub fn fail_for(&self, target: &str) {
        self.failing.lock().unwrap().insert(target.to_string());
    }

    pub fn slow_down(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "test"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, NudgeError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), NudgeError> {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let target = message.reply_target.clone().unwrap_or_default();
        if self.failing.lock().unwrap().contains(&target) {
            return Err(NudgeError::Channel(format!("blocked by {target}")));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn answer_callback(&self, query_id: &str, text: &str) -> Result<(), NudgeError> {
        self.answered
            .lock()
            .unwrap()
            .push((query_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, NudgeError> {
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| NudgeError::Channel(format!("no file {file_id}")))
    }

    async fn stop(&self) -> Result<(), NudgeError> {
        Ok(())
    }
}

/// Upserts and listings against a map; `broken` makes every call fail.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<BTreeMap<UserId, UserRecord>>,
    pub upserts: Mutex<Vec<(UserId, String, i64)>>,
    pub broken: bool,
    /// Latency added to every upsert.
    pub latency: Duration,
}

impl MemoryStore {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn slow(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn with_users(ids: &[i64]) -> Self {
        let store = Self::default();
        {
            let mut users = store.users.lock().unwrap();
            for &id in ids {
                users.insert(
                    UserId(id),
                    UserRecord {
                        id: UserId(id),
                        name: format!("user{id}"),
                        age: 30,
                    },
                );
            }
        }
        store
    }

    pub fn upserts(&self) -> Vec<(UserId, String, i64)> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_user(&self, id: UserId, name: &str, age: i64) -> Result<(), NudgeError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.broken {
            return Err(NudgeError::Memory("disk full".into()));
        }
        self.upserts
            .lock()
            .unwrap()
            .push((id, name.to_string(), age));
        self.users.lock().unwrap().insert(
            id,
            UserRecord {
                id,
                name: name.to_string(),
                age,
            },
        );
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, NudgeError> {
        if self.broken {
            return Err(NudgeError::Memory("database is locked".into()));
        }
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }
}

/// Knows a fixed set of cities; `Atlantis` is never found, `Error City` fails.
#[derive(Default)]
pub struct FixedWeather {
    pub lookups: Mutex<Vec<String>>,
}

#[async_trait]
impl WeatherLookup for FixedWeather {
    async fn lookup(&self, city: &str) -> Result<WeatherSummary, WeatherError> {
        self.lookups.lock().unwrap().push(city.to_string());
        match city {
            "Atlantis" => Err(WeatherError::NotFound),
            "Error City" => Err(WeatherError::Request("connection reset".into())),
            "Garbled" => Err(WeatherError::Malformed("expected value".into())),
            "Void" => Err(WeatherError::Incomplete),
            _ => Ok(WeatherSummary {
                temperature: 12.5,
                windspeed: 3.0,
                humidity: Some(80.0),
                weather_code: Some(0),
            }),
        }
    }
}

pub fn text_from(user: i64, text: &str) -> IncomingMessage {
    IncomingMessage::new("test", UserId(user), Payload::Text(text.to_string()))
}
