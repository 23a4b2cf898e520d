use std::time::Duration;

use thiserror::Error;

/// Main error type for the chat widget
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Message handler error: {0}")]
    HandlerError(String),

    #[error("Response timed out after {0:?}")]
    Timeout(Duration),
}
