//! Error types for rollgate-core

use thiserror::Error;

/// Main error type for the rollgate-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Event rejected at the inbound boundary (not an object, etc.)
    #[error("event error: {0}")]
    Event(String),

    /// Delivery to the collector failed (network, TLS, timeout)
    #[error("delivery error: {0}")]
    Delivery(String),
}

/// Result type alias for rollgate-core
pub type Result<T> = std::result::Result<T, Error>;
