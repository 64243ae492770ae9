use thiserror::Error;

/// Top-level error type for Nudge.
#[derive(Debug, Error)]
pub enum NudgeError {
    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Storage error.
    #[error("memory error: {0}")]
    Memory(String),
}
