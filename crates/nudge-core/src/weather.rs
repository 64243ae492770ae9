//! Result types of the external geocoding + weather lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current conditions for a resolved city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Temperature in °C.
    pub temperature: f64,
    /// Wind speed in m/s.
    pub windspeed: f64,
    /// Relative humidity in percent, when the forecast carried one.
    pub humidity: Option<f64>,
    /// Forecast weather code.
    pub weather_code: Option<i64>,
}

/// Why a lookup produced no summary.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The geocoder knows no place with that name.
    #[error("city not found")]
    NotFound,

    /// The forecast response lacked current or hourly data.
    #[error("forecast response is incomplete")]
    Incomplete,

    /// Network or HTTP status failure; worth retrying later.
    #[error("request failed: {0}")]
    Request(String),

    /// A response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),
}
