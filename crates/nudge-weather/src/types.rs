//! Response types of the geocoding and forecast APIs.

use nudge_core::weather::{WeatherError, WeatherSummary};
use serde::Deserialize;

/// One Nominatim search hit. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct Place {
    pub lat: String,
    pub lon: String,
}

impl Place {
    pub fn coordinates(&self) -> Result<(f64, f64), WeatherError> {
        let lat = self
            .lat
            .trim()
            .parse()
            .map_err(|e| WeatherError::Malformed(format!("latitude '{}': {e}", self.lat)))?;
        let lon = self
            .lon
            .trim()
            .parse()
            .map_err(|e| WeatherError::Malformed(format!("longitude '{}': {e}", self.lon)))?;
        Ok((lat, lon))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Forecast {
    pub current_weather: Option<CurrentWeather>,
    pub hourly: Option<Hourly>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Hourly {
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
}

impl Forecast {
    /// Reduce a forecast to the summary shown to the user.
    ///
    /// Humidity is the first hourly value of the day.
    pub fn summarize(self) -> Result<WeatherSummary, WeatherError> {
        let (Some(current), Some(hourly)) = (self.current_weather, self.hourly) else {
            return Err(WeatherError::Incomplete);
        };
        Ok(WeatherSummary {
            temperature: current.temperature,
            windspeed: current.windspeed,
            humidity: hourly.relative_humidity_2m.first().copied().flatten(),
            weather_code: current.weathercode,
        })
    }
}
