//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - Configurable log levels
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use exposure::logging::init_logging;
//! use exposure::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the creation of a patient or event
///
/// # Example
///
/// ```no_run
/// use exposure::log_record_created;
/// use exposure::domain::RecordId;
///
/// let id = RecordId::generate();
/// log_record_created!("patient", &id);
/// ```
#[macro_export]
macro_rules! log_record_created {
    ($kind:expr, $id:expr) => {
        tracing::info!(
            record_kind = $kind,
            record_id = %$id,
            "Record created"
        );
    };
}

/// Log the removal of a patient or event
///
/// The three-argument form also records how many dependent events went with it.
///
/// # Example
///
/// ```no_run
/// use exposure::log_record_removed;
/// use exposure::domain::RecordId;
///
/// let id = RecordId::generate();
/// log_record_removed!("event", &id);
/// log_record_removed!("patient", &id, 2);
/// ```
#[macro_export]
macro_rules! log_record_removed {
    ($kind:expr, $id:expr) => {
        tracing::info!(
            record_kind = $kind,
            record_id = %$id,
            "Record removed"
        );
    };
    ($kind:expr, $id:expr, $cascaded:expr) => {
        tracing::info!(
            record_kind = $kind,
            record_id = %$id,
            cascaded_events = $cascaded,
            "Record removed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use exposure::log_error_with_context;
/// use exposure::domain::ExposureError;
///
/// let error = ExposureError::Storage("connection reset".to_string());
/// log_error_with_context!(&error, "Failed to list patients");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
