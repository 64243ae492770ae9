//! # nudge-core
//!
//! Core types, traits, configuration, and error handling for the Nudge bot.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;
pub mod user;
pub mod weather;

pub use config::shellexpand;
