//! Event domain model
//!
//! An Event is a timestamped location/exposure entry belonging to one
//! Patient. The reference is weak: only the owner's id is stored.

use super::ids::RecordId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Fields a partial update may touch
pub const EVENT_UPDATABLE_FIELDS: [&str; 6] = [
    "timeFrom",
    "timeTo",
    "locationType",
    "location",
    "detail",
    "patientId",
];

/// Where an event took place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Indoor,
    Outdoor,
    Home,
    Travelling,
}

impl LocationType {
    /// Returns the lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Indoor => "indoor",
            LocationType::Outdoor => "outdoor",
            LocationType::Home => "home",
            LocationType::Travelling => "travelling",
        }
    }

    /// Indoor and outdoor events must name their location
    pub fn requires_location(&self) -> bool {
        matches!(self, LocationType::Indoor | LocationType::Outdoor)
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indoor" => Ok(LocationType::Indoor),
            "outdoor" => Ok(LocationType::Outdoor),
            "home" => Ok(LocationType::Home),
            "travelling" => Ok(LocationType::Travelling),
            _ => Err(format!("the location type {s} is not supported")),
        }
    }
}

/// Closed time range `[from, to]` of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

/// A stored event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Storage-assigned identifier
    pub id: RecordId,

    pub time_from: DateTime<Utc>,

    pub time_to: DateTime<Utc>,

    /// Trimmed free-text description
    pub detail: String,

    pub location_type: LocationType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Owning patient
    pub patient_id: RecordId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Materializes a validated draft into a stored record
    pub fn from_draft(id: RecordId, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            time_from: draft.time_from,
            time_to: draft.time_to,
            detail: draft.detail,
            location_type: draft.location_type,
            location: draft.location,
            patient_id: draft.patient_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.time_from, self.time_to)
    }

    /// Mutable fields in wire form, the base a partial update is merged onto
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "timeFrom".to_string(),
            Value::from(self.time_from.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );
        fields.insert(
            "timeTo".to_string(),
            Value::from(self.time_to.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );
        fields.insert("detail".to_string(), Value::from(self.detail.clone()));
        fields.insert(
            "locationType".to_string(),
            Value::from(self.location_type.as_str()),
        );
        if let Some(location) = &self.location {
            fields.insert("location".to_string(), Value::from(location.clone()));
        }
        fields.insert(
            "patientId".to_string(),
            Value::from(self.patient_id.as_str()),
        );
        fields
    }

    /// Replaces the mutable fields with those of a validated draft
    pub fn apply(&mut self, draft: EventDraft) {
        self.time_from = draft.time_from;
        self.time_to = draft.time_to;
        self.detail = draft.detail;
        self.location_type = draft.location_type;
        self.location = draft.location;
        self.patient_id = draft.patient_id;
    }
}

/// Validated event values that have not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub time_from: DateTime<Utc>,
    pub time_to: DateTime<Utc>,
    pub detail: String,
    pub location_type: LocationType,
    pub location: Option<String>,
    pub patient_id: RecordId,
}

impl EventDraft {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.time_from, self.time_to)
    }
}
