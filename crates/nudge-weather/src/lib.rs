//! # nudge-weather
//!
//! Resolves a city name with Nominatim and fetches its current weather
//! from Open-Meteo.

pub mod open_meteo;
mod types;


pub use open_meteo::OpenMeteo;
