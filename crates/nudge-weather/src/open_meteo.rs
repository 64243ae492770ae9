//! Nominatim + Open-Meteo implementation of [`WeatherLookup`].

use crate::types::{Forecast, Place};
use async_trait::async_trait;
use nudge_core::{
    config::WeatherConfig,
    traits::WeatherLookup,
    weather::{WeatherError, WeatherSummary},
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Hourly series requested alongside the current conditions.
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,windspeed_10m,weathercode";

/// Weather lookup over public HTTP APIs.
pub struct OpenMeteo {
    client: reqwest::Client,
    geocode_url: String,
    forecast_url: String,
}

impl OpenMeteo {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Request(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            geocode_url: config.geocode_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    /// Resolve a city to its first geocoder hit.
    async fn geocode(&self, city: &str) -> Result<Place, WeatherError> {
        let places: Vec<Place> = self
            .get_json(
                &self.geocode_url,
                &[("format", "json"), ("limit", "1"), ("q", city)],
            )
            .await?;
        places.into_iter().next().ok_or(WeatherError::NotFound)
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast, WeatherError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        self.get_json(
            &self.forecast_url,
            &[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current_weather", "true"),
                ("hourly", HOURLY_FIELDS),
                ("windspeed_unit", "ms"),
            ],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let body = resp
            .bytes()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| WeatherError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl WeatherLookup for OpenMeteo {
    async fn lookup(&self, city: &str) -> Result<WeatherSummary, WeatherError> {
        let place = self.geocode(city).await?;
        let (lat, lon) = place.coordinates()?;
        debug!("weather: '{city}' resolved to {lat},{lon}");

        let summary = self.forecast(lat, lon).await?.summarize();
        if let Err(ref e) = summary {
            warn!("weather: forecast for '{city}' unusable: {e}");
        }
        summary
    }
}
