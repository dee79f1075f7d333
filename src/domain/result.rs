//! Result type alias for Exposure

use super::errors::ExposureError;

/// Result type alias for Exposure operations
///
/// # Examples
///
/// ```
/// use exposure::domain::result::Result;
/// use exposure::domain::errors::ExposureError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ExposureError::Validation("invalid age".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExposureError>;
