//! Record lifecycle management
//!
//! [`RecordManager`] applies the validation rules before every write, enforces
//! the patient population cap and update whitelists, and cascades patient
//! deletion to the patient's events.
//!
//! Every operation is one linear sequence of storage calls. Nothing locks
//! across calls, so two concurrent event creations for one patient can both
//! pass the overlap check. The cascade removes events first and the patient
//! second, in two separate writes.
//!
//! # Example
//!
//! ```rust
//! use exposure::adapters::database::RecordStores;
//! use exposure::core::records::{RecordManager, RecordPolicy};
//! use serde_json::json;
//!
//! # async fn example() -> exposure::domain::Result<()> {
//! let stores = RecordStores::memory();
//! let manager = RecordManager::new(stores.patients, stores.events, RecordPolicy::default());
//!
//! let patient = manager
//!     .create_patient(&json!({"gender": "female", "age": 29, "occupation": "Nurse"}))
//!     .await?;
//! assert_eq!(patient.occupation, "nurse");
//! # Ok(())
//! # }
//! ```

mod events;
mod patients;

use crate::adapters::database::traits::{EventStore, PatientStore};
use crate::config::schema::RecordsConfig;
use crate::core::validation::OverlapMode;
use crate::domain::ids::{RecordId, INVALID_ID_MESSAGE};
use crate::domain::{ExposureError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Message for updates naming a field outside the whitelist
pub const INVALID_INPUT_MESSAGE: &str = "input data is invalid";

/// Rules the manager enforces, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordPolicy {
    /// Creation fails once this many patients exist
    pub max_patients: u64,
    pub overlap_mode: OverlapMode,
    /// Re-run the overlap check when an update touches an event
    pub recheck_overlap_on_update: bool,
}

impl Default for RecordPolicy {
    fn default() -> Self {
        Self {
            max_patients: 8,
            overlap_mode: OverlapMode::Endpoints,
            recheck_overlap_on_update: false,
        }
    }
}

impl From<&RecordsConfig> for RecordPolicy {
    fn from(config: &RecordsConfig) -> Self {
        Self {
            max_patients: config.max_patients,
            overlap_mode: config.overlap_mode,
            recheck_overlap_on_update: config.recheck_overlap_on_update,
        }
    }
}

/// What an event lookup id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupScope {
    /// The id of the event itself
    #[default]
    Record,
    /// The id of the owning patient
    Patient,
}

impl LookupScope {
    /// Reads the `type` query discriminator; only `patient` selects patient scope
    pub fn from_query(discriminator: Option<&str>) -> Self {
        match discriminator {
            Some("patient") => LookupScope::Patient,
            _ => LookupScope::Record,
        }
    }
}

/// Result of a partial update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome<T> {
    /// Snapshot before the update
    pub origin: T,
    /// Snapshot after the update
    pub updated: T,
    /// Request body as received
    pub request: Value,
}

/// Validated CRUD over patients and events
#[derive(Clone)]
pub struct RecordManager {
    patients: Arc<dyn PatientStore + Send + Sync>,
    events: Arc<dyn EventStore + Send + Sync>,
    policy: RecordPolicy,
}

impl RecordManager {
    pub fn new(
        patients: Arc<dyn PatientStore + Send + Sync>,
        events: Arc<dyn EventStore + Send + Sync>,
        policy: RecordPolicy,
    ) -> Self {
        Self {
            patients,
            events,
            policy,
        }
    }

    pub fn policy(&self) -> &RecordPolicy {
        &self.policy
    }
}

/// Checks the id shape before any storage access
pub(crate) fn parse_id(raw: &str) -> Result<RecordId> {
    RecordId::new(raw).map_err(|_| ExposureError::InvalidId(INVALID_ID_MESSAGE.to_string()))
}

/// Borrows a request body as a JSON object
pub(crate) fn as_document(payload: &Value) -> Result<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| ExposureError::Validation("request body must be a JSON object".to_string()))
}

/// Merges a whitelisted partial update over the stored fields
///
/// Fails without touching `base` if any key is outside `whitelist`. A `null`
/// value clears the field.
pub(crate) fn merge_update(
    mut base: Map<String, Value>,
    body: &Value,
    whitelist: &[&str],
) -> Result<Map<String, Value>> {
    let changes = body
        .as_object()
        .ok_or_else(|| ExposureError::InvalidField(INVALID_INPUT_MESSAGE.to_string()))?;

    if !changes.keys().all(|key| whitelist.contains(&key.as_str())) {
        return Err(ExposureError::InvalidField(INVALID_INPUT_MESSAGE.to_string()));
    }

    for (key, value) in changes {
        if value.is_null() {
            base.remove(key);
        } else {
            base.insert(key.clone(), value.clone());
        }
    }

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Map<String, Value> {
        match json!({"gender": "male", "age": 30, "occupation": "driver"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    const WHITELIST: [&str; 3] = ["gender", "age", "occupation"];

    #[test]
    fn test_parse_id() {
        assert!(parse_id("5f1d7a3b9c2e4f6a8b0c1d2e").is_ok());
        let err = parse_id("123").unwrap_err();
        assert!(matches!(err, ExposureError::InvalidId(ref m) if m == "id is invalid"));
    }

    #[test]
    fn test_lookup_scope_from_query() {
        assert_eq!(LookupScope::from_query(Some("patient")), LookupScope::Patient);
        assert_eq!(LookupScope::from_query(Some("event")), LookupScope::Record);
        assert_eq!(LookupScope::from_query(None), LookupScope::Record);
    }

    #[test]
    fn test_merge_update_applies_whitelisted_keys() {
        let merged = merge_update(base(), &json!({"age": 31}), &WHITELIST).unwrap();
        assert_eq!(merged["age"], 31);
        assert_eq!(merged["gender"], "male");
    }

    #[test]
    fn test_merge_update_rejects_unknown_key_entirely() {
        let err = merge_update(base(), &json!({"age": 31, "foo": 1}), &WHITELIST).unwrap_err();
        assert!(matches!(err, ExposureError::InvalidField(ref m) if m == INVALID_INPUT_MESSAGE));
    }

    #[test]
    fn test_merge_update_rejects_non_object_body() {
        assert!(merge_update(base(), &json!([1, 2]), &WHITELIST).is_err());
    }

    #[test]
    fn test_merge_update_null_clears_field() {
        let merged = merge_update(base(), &json!({"occupation": null}), &WHITELIST).unwrap();
        assert!(!merged.contains_key("occupation"));
    }

    #[test]
    fn test_policy_default() {
        let policy = RecordPolicy::default();
        assert_eq!(policy.max_patients, 8);
        assert_eq!(policy.overlap_mode, OverlapMode::Endpoints);
        assert!(!policy.recheck_overlap_on_update);
    }
}
