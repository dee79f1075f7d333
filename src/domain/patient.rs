//! Patient domain model
//!
//! A Patient is the root entity: a tracked individual owning zero or more
//! Events through their `patientId`.

use super::ids::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Fields a partial update may touch
pub const PATIENT_UPDATABLE_FIELDS: [&str; 3] = ["gender", "age", "occupation"];

/// Patient gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Returns the lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("the gender type {s} is not supported")),
        }
    }
}

/// A stored patient
///
/// # Examples
///
/// ```
/// use exposure::domain::patient::{Gender, Patient, PatientDraft};
/// use exposure::domain::ids::RecordId;
/// use chrono::Utc;
///
/// let draft = PatientDraft::new(Gender::Female, 34, "nurse");
/// let patient = Patient::from_draft(RecordId::generate(), draft, Utc::now());
/// assert_eq!(patient.occupation, "nurse");
/// assert_eq!(patient.created_at, patient.updated_at);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Storage-assigned identifier
    pub id: RecordId,

    pub gender: Gender,

    pub age: u32,

    /// Trimmed, lowercase
    pub occupation: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Materializes a validated draft into a stored record
    pub fn from_draft(id: RecordId, draft: PatientDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            gender: draft.gender,
            age: draft.age,
            occupation: draft.occupation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mutable fields in wire form, the base a partial update is merged onto
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("gender".to_string(), Value::from(self.gender.as_str()));
        fields.insert("age".to_string(), Value::from(self.age));
        fields.insert("occupation".to_string(), Value::from(self.occupation.clone()));
        fields
    }

    /// Replaces the mutable fields with those of a validated draft
    pub fn apply(&mut self, draft: PatientDraft) {
        self.gender = draft.gender;
        self.age = draft.age;
        self.occupation = draft.occupation;
    }
}

/// Validated patient values that have not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDraft {
    pub gender: Gender,
    pub age: u32,
    pub occupation: String,
}

impl PatientDraft {
    /// Creates a draft, normalizing the occupation
    pub fn new(gender: Gender, age: u32, occupation: impl Into<String>) -> Self {
        Self {
            gender,
            age,
            occupation: occupation.into().trim().to_lowercase(),
        }
    }
}
