//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, ExposureConfig};
use super::secret_string;
use crate::core::validation::OverlapMode;
use crate::domain::errors::ExposureError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Prefix of every override variable
pub const ENV_PREFIX: &str = "EXPOSURE";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExposureConfig
/// 4. Applies environment variable overrides (EXPOSURE_* prefix, plus PORT)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a `Configuration` error if the file is missing or unreadable, a
/// referenced variable is unset, parsing fails, an override cannot be parsed
/// or validation fails.
///
/// # Examples
///
/// ```no_run
/// use exposure::config::loader::load_config;
///
/// let config = load_config("exposure.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExposureConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExposureError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExposureError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ExposureConfig = toml::from_str(&contents)
        .map_err(|e| ExposureError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ExposureError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExposureError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ExposureError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ExposureError::Configuration(format!("Invalid value for {ENV_PREFIX}_{key}: {e}"))
    })
}

/// Applies environment variable overrides using the EXPOSURE_* prefix
///
/// Variables follow the pattern EXPOSURE_<SECTION>_<KEY>, for example
/// EXPOSURE_SERVER_PORT or EXPOSURE_RECORDS_MAX_PATIENTS. A bare `PORT`
/// overrides `server.port` unless EXPOSURE_SERVER_PORT is also set.
fn apply_env_overrides(config: &mut ExposureConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = env_var("DATABASE_TARGET") {
        config.database_target = match val.trim().to_lowercase().as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(ExposureError::Configuration(format!(
                    "Invalid value for {ENV_PREFIX}_DATABASE_TARGET: {other}"
                )))
            }
        };
    }

    // Server overrides
    if let Some(val) = env_var("SERVER_HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("PORT") {
        config.server.port = parse_override("SERVER_PORT", &val)?;
    }
    if let Some(val) = env_var("SERVER_PORT") {
        config.server.port = parse_override("SERVER_PORT", &val)?;
    }
    if let Some(val) = env_var("SERVER_ALLOWED_ORIGINS") {
        config.server.allowed_origins = val
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(val) = env_var("SERVER_SHUTDOWN_TIMEOUT_SECS") {
        config.server.shutdown_timeout_secs = parse_override("SERVER_SHUTDOWN_TIMEOUT_SECS", &val)?;
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Some(val) = env_var("POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Some(val) = env_var("POSTGRESQL_MAX_CONNECTIONS") {
            pg_config.max_connections = parse_override("POSTGRESQL_MAX_CONNECTIONS", &val)?;
        }
    }

    // Records overrides
    if let Some(val) = env_var("RECORDS_MAX_PATIENTS") {
        config.records.max_patients = parse_override("RECORDS_MAX_PATIENTS", &val)?;
    }
    if let Some(val) = env_var("RECORDS_OVERLAP_MODE") {
        config.records.overlap_mode = parse_override::<OverlapMode>("RECORDS_OVERLAP_MODE", &val)?;
    }
    if let Some(val) = env_var("RECORDS_RECHECK_OVERLAP_ON_UPDATE") {
        config.records.recheck_overlap_on_update =
            parse_override("RECORDS_RECHECK_OVERLAP_ON_UPDATE", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_var("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
