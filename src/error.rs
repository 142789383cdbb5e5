use std::io;
use thiserror::Error;

/// Custom error type for Sentinel
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("History store corrupt: {0}")]
    StoreCorrupt(String),

    #[error("Command failed: {0}")]
    Command(String),
}

/// Result type alias for Sentinel
pub type Result<T> = std::result::Result<T, SentinelError>;

impl SentinelError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SentinelError::Config(msg.into())
    }

    pub fn sensor_unavailable<S: Into<String>>(msg: S) -> Self {
        SentinelError::SensorUnavailable(msg.into())
    }

    pub fn store_corrupt<S: Into<String>>(msg: S) -> Self {
        SentinelError::StoreCorrupt(msg.into())
    }

    pub fn command<S: Into<String>>(msg: S) -> Self {
        SentinelError::Command(msg.into())
    }
}
