//! Domain error types
//!
//! This module defines the error hierarchy for Exposure. Every variant renders
//! as a bare human-readable message because the API layer echoes it verbatim
//! in the response envelope.

use thiserror::Error;

/// Main Exposure error type
///
/// This is the primary error type used throughout the application.
/// The API layer maps each variant to an HTTP status code.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// Field or cross-field rule violation
    #[error("{0}")]
    Validation(String),

    /// Candidate event interval conflicts with a stored event
    #[error("{0}")]
    Overlap(String),

    /// Patient population cap reached
    #[error("{0}")]
    Capacity(String),

    /// Malformed record identifier
    #[error("{0}")]
    InvalidId(String),

    /// Partial update carried a key outside the entity's whitelist
    #[error("{0}")]
    InvalidField(String),

    /// No matching record
    #[error("{0}")]
    NotFound(String),

    /// Storage adapter failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ExposureError {
    /// Returns true for errors caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExposureError::Validation(_)
                | ExposureError::Overlap(_)
                | ExposureError::Capacity(_)
                | ExposureError::InvalidId(_)
                | ExposureError::InvalidField(_)
                | ExposureError::Serialization(_)
        )
    }

    /// Short machine-friendly name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            ExposureError::Validation(_) => "validation",
            ExposureError::Overlap(_) => "overlap",
            ExposureError::Capacity(_) => "capacity",
            ExposureError::InvalidId(_) => "invalid_id",
            ExposureError::InvalidField(_) => "invalid_field",
            ExposureError::NotFound(_) => "not_found",
            ExposureError::Storage(_) => "storage",
            ExposureError::Configuration(_) => "configuration",
            ExposureError::Serialization(_) => "serialization",
            ExposureError::Io(_) => "io",
            ExposureError::Other(_) => "other",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExposureError {
    fn from(err: std::io::Error) -> Self {
        ExposureError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExposureError {
    fn from(err: serde_json::Error) -> Self {
        ExposureError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExposureError {
    fn from(err: toml::de::Error) -> Self {
        ExposureError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for ExposureError {
    fn from(err: tokio_postgres::Error) -> Self {
        ExposureError::Storage(err.to_string())
    }
}
