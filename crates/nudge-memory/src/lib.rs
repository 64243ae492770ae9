//! # nudge-memory
//!
//! Persistent storage of registered users (SQLite-backed).

pub mod store;

pub use store::Store;
