//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Nudge".to_string()
}

pub fn default_data_dir() -> String {
    "~/.nudge".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_language() -> String {
    "Russian".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_db_path() -> String {
    "~/.nudge/data/users.db".to_string()
}

/// 15 minutes to answer a registration question.
pub fn default_reply_timeout_secs() -> u64 {
    900
}

pub fn default_reminder_time() -> String {
    "09:00".to_string()
}

pub fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

pub fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

pub fn default_user_agent() -> String {
    concat!("nudge-bot/", env!("CARGO_PKG_VERSION")).to_string()
}

pub fn default_lookup_timeout_secs() -> u64 {
    15
}
