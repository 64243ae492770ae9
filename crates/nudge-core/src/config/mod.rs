mod channels;
mod defaults;


pub use channels::*;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::NudgeError;
use defaults::*;

/// Environment variables consulted for the Telegram token, in order.
const TOKEN_ENV_VARS: &[&str] = &["TELEGRAM_BOT_TOKEN", "API_TOKEN"];

/// Top-level Nudge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Language of every user-facing reply ("Russian" or "English").
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            language: default_language(),
        }
    }
}

/// Memory config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Conversation flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// How long a registration question may stay unanswered before the
    /// user is reminded.
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,
}

impl ConversationConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            reply_timeout_secs: default_reply_timeout_secs(),
        }
    }
}

/// Daily notification to every registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Local wall-clock time of the daily run ("HH:MM").
    #[serde(default = "default_reminder_time")]
    pub time: String,
}

impl ReminderConfig {
    /// Parse `time` into a wall-clock time.
    pub fn trigger_time(&self) -> Result<NaiveTime, NudgeError> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").map_err(|e| {
            NudgeError::Config(format!(
                "invalid reminder time '{}' (expected HH:MM): {e}",
                self.time
            ))
        })
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time: default_reminder_time(),
        }
    }
}

/// Geocoding and forecast endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Sent as `User-Agent`; Nominatim rejects anonymous clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            forecast_url: default_forecast_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. An empty Telegram
/// token is filled from the environment.
pub fn load(path: &str) -> Result<Config, NudgeError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NudgeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_token(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, NudgeError> {
    toml::from_str(content).map_err(|e| NudgeError::Config(format!("failed to parse config: {e}")))
}

/// Fill a missing Telegram token from the environment.
///
/// With no `[channel.telegram]` section at all, a token in the environment
/// enables the channel.
fn apply_env_token(config: &mut Config, env: impl Fn(&str) -> Option<String>) {
    let token = TOKEN_ENV_VARS
        .iter()
        .filter_map(|&key| env(key))
        .find(|value| !value.trim().is_empty());
    let Some(token) = token else {
        return;
    };

    match config.channel.telegram.as_mut() {
        Some(tg) if tg.bot_token.is_empty() => tg.bot_token = token,
        Some(_) => {}
        None => {
            config.channel.telegram = Some(TelegramConfig {
                enabled: true,
                bot_token: token,
                allowed_users: Vec::new(),
            });
        }
    }
}
