//! Secure credential handling using the secrecy crate
//!
//! The PostgreSQL connection string carries a password, so it is held in a
//! `secrecy::Secret`. It is redacted in `Debug` output and zeroed on drop;
//! reading it takes an explicit `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use exposure::config::{secret_string, SecretString};
//! use secrecy::ExposeSecret;
//!
//! let url: SecretString = secret_string("postgresql://u:p@db/exposure".to_string());
//! assert!(url.expose_secret().starts_with("postgresql://"));
//!
//! // Debug output is redacted
//! assert!(!format!("{url:?}").contains("u:p"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use zeroize::Zeroize;

/// String payload of a [`SecretString`], wiped on drop
///
/// Dereferences to `str` once exposed, so callers parse or inspect it
/// without copying it out.
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl Deref for SecretValue {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Connection strings and other credentials read from configuration
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string read from a file or the environment
///
/// ```rust
/// use exposure::config::secret_string;
///
/// let connection_string = secret_string("postgresql://localhost/exposure".to_string());
/// ```
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_exposed_value_derefs_to_str() {
        let secret = secret_string("postgresql://db:5432/exposure".to_string());
        assert_eq!(secret.expose_secret(), "postgresql://db:5432/exposure");
        assert_eq!(secret.expose_secret().rsplit_once(':').map(|(_, tail)| tail), Some("5432/exposure"));
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        // Should not contain the actual secret
        assert!(!debug_output.contains("sensitive-data"));
        // Should contain redaction indicator
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_serde() {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize)]
        struct PoolSection {
            connection_string: SecretString,
        }

        let section: PoolSection =
            toml::from_str("connection_string = \"postgres://x@db/exposure\"").unwrap();
        assert_eq!(section.connection_string.expose_secret(), "postgres://x@db/exposure");

        let json = serde_json::to_string(&section).unwrap();
        assert!(json.contains("postgres://x@db/exposure"));
    }
}
