//! Error types for the rate/fee engine and assistant

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {

    // =============================
    // Data Availability
    // =============================

    #[error("Rate data unavailable: {0}")]
    RateUnavailable(String),

    #[error("Fee data unavailable: {0}")]
    FeeUnavailable(String),

    #[error("Endpoint not configured: {0}")]
    NotConfigured(String),

    // =============================
    // Local Subsystems
    // =============================

    #[error("Client state error: {0}")]
    StateError(String),

    #[error("Speech error: {0}")]
    SpeechError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
