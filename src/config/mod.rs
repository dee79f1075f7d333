//! Configuration management for Exposure.
//!
//! TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `EXPOSURE_<SECTION>_<KEY>` overrides and the bare `PORT` variable
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use exposure::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("exposure.toml")?;
//!
//! println!("Listening on {}", config.server.bind_address());
//! println!("Patient cap: {}", config.records.max_patients);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - Bind address, CORS allow-list, shutdown grace period
//! - [`PostgreSQLConfig`] - PostgreSQL connection and pool settings
//! - [`RecordsConfig`] - Patient cap and overlap rules
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [server]
//! port = 3000
//! allowed_origins = ["http://localhost:8080"]
//!
//! [postgresql]
//! connection_string = "${EXPOSURE_PG_URL}"
//!
//! [records]
//! max_patients = 8
//! overlap_mode = "endpoints"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DatabaseTarget, ExposureConfig, LoggingConfig, PostgreSQLConfig,
    RecordsConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
