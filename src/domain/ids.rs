//! Record identifier type with validation
//!
//! Identifiers are opaque strings. The only shape rule is a minimum length of
//! 24 characters, the length of a document-database object id; anything
//! shorter is rejected before any storage access.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Minimum length of any id-like input
pub const MIN_ID_LENGTH: usize = 24;

/// Message reported for malformed identifiers
pub const INVALID_ID_MESSAGE: &str = "id is invalid";

/// Record identifier newtype wrapper
///
/// Shared by Patients and Events. Generated ids are 24 lowercase hex
/// characters: the creation time in seconds followed by random bits.
///
/// # Examples
///
/// ```
/// use exposure::domain::ids::RecordId;
/// use std::str::FromStr;
///
/// let id = RecordId::from_str("5f1d7a3b9c2e4f6a8b0c1d2e").unwrap();
/// assert_eq!(id.as_str(), "5f1d7a3b9c2e4f6a8b0c1d2e");
/// assert!(RecordId::from_str("too-short").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(RecordId)` if the id is at least 24 characters long,
    /// `Err` with the message `"id is invalid"` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.chars().count() < MIN_ID_LENGTH {
            return Err(INVALID_ID_MESSAGE.to_string());
        }
        Ok(Self(id))
    }

    /// Generates a fresh identifier for a new record
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp().max(0) as u32;
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{:08x}{}", seconds, &random[..16]))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_24_chars() {
        let id = RecordId::new("5f1d7a3b9c2e4f6a8b0c1d2e").unwrap();
        assert_eq!(id.as_str(), "5f1d7a3b9c2e4f6a8b0c1d2e");
    }

    #[test]
    fn test_record_id_accepts_longer_ids() {
        assert!(RecordId::new("5f1d7a3b9c2e4f6a8b0c1d2e-extra").is_ok());
    }

    #[test]
    fn test_record_id_rejects_short_ids() {
        assert_eq!(RecordId::new("").unwrap_err(), "id is invalid");
        assert!(RecordId::new("5f1d7a3b9c2e4f6a8b0c1d2").is_err());
    }

    #[test]
    fn test_generated_ids_are_object_id_shaped() {
        let id = RecordId::generate();
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(RecordId::generate(), id);
    }

    #[test]
    fn test_record_id_deserialization_validates() {
        let ok: Result<RecordId, _> = serde_json::from_str("\"5f1d7a3b9c2e4f6a8b0c1d2e\"");
        assert!(ok.is_ok());

        let short: Result<RecordId, _> = serde_json::from_str("\"abc\"");
        assert!(short.is_err());
    }
}
