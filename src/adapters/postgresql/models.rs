//! PostgreSQL row models
//!
//! Each record is stored as a JSONB document next to the columns the adapter
//! filters and orders on. The timestamp columns are authoritative.

use crate::domain::event::Event;
use crate::domain::patient::Patient;
use crate::domain::{ExposureError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_postgres::Row;

/// Row of the `patients` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgreSQLPatient {
    pub id: String,

    /// Full patient in wire form
    pub document: Value,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PostgreSQLPatient {
    /// Convert from domain Patient to a row
    pub fn from_domain(patient: &Patient) -> Result<Self> {
        Ok(Self {
            id: patient.id.to_string(),
            document: serde_json::to_value(patient)?,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        })
    }

    /// Read a row returned by `SELECT id, document, created_at, updated_at`
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            document: row.try_get("document")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Convert to domain Patient
    pub fn to_domain(self) -> Result<Patient> {
        let mut patient: Patient = serde_json::from_value(self.document).map_err(|e| {
            ExposureError::Storage(format!("Corrupt patient document {}: {e}", self.id))
        })?;
        patient.created_at = self.created_at;
        patient.updated_at = self.updated_at;
        Ok(patient)
    }
}

/// Row of the `events` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgreSQLEvent {
    pub id: String,

    /// Owning patient, duplicated out of the document for indexed lookups
    pub patient_id: String,

    /// Full event in wire form
    pub document: Value,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PostgreSQLEvent {
    /// Convert from domain Event to a row
    pub fn from_domain(event: &Event) -> Result<Self> {
        Ok(Self {
            id: event.id.to_string(),
            patient_id: event.patient_id.to_string(),
            document: serde_json::to_value(event)?,
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
    }

    /// Read a row returned by `SELECT id, patient_id, document, created_at, updated_at`
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            patient_id: row.try_get("patient_id")?,
            document: row.try_get("document")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Convert to domain Event
    pub fn to_domain(self) -> Result<Event> {
        let mut event: Event = serde_json::from_value(self.document).map_err(|e| {
            ExposureError::Storage(format!("Corrupt event document {}: {e}", self.id))
        })?;
        event.created_at = self.created_at;
        event.updated_at = self.updated_at;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{EventDraft, LocationType};
    use crate::domain::ids::RecordId;
    use crate::domain::patient::{Gender, PatientDraft};
    use chrono::{Duration, TimeZone};

    fn sample_event() -> Event {
        Event::from_draft(
            RecordId::generate(),
            EventDraft {
                time_from: Utc.with_ymd_and_hms(2020, 5, 4, 8, 0, 0).unwrap(),
                time_to: Utc.with_ymd_and_hms(2020, 5, 4, 9, 30, 0).unwrap(),
                detail: "bus ride".to_string(),
                location_type: LocationType::Travelling,
                location: None,
                patient_id: RecordId::new("5f1d7a3b9c2e4f6a8b0c1d2e").unwrap(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_patient_row_round_trip() {
        let patient = Patient::from_draft(
            RecordId::generate(),
            PatientDraft::new(Gender::Female, 52, "baker"),
            Utc::now(),
        );

        let row = PostgreSQLPatient::from_domain(&patient).unwrap();
        assert_eq!(row.id, patient.id.as_str());
        assert_eq!(row.document["occupation"], "baker");

        assert_eq!(row.to_domain().unwrap(), patient);
    }

    #[test]
    fn test_event_row_keeps_patient_id_column() {
        let event = sample_event();
        let row = PostgreSQLEvent::from_domain(&event).unwrap();

        assert_eq!(row.patient_id, "5f1d7a3b9c2e4f6a8b0c1d2e");
        assert_eq!(row.document["locationType"], "travelling");
        assert!(row.document.get("location").is_none());
    }

    #[test]
    fn test_timestamp_columns_override_document() {
        let event = sample_event();
        let mut row = PostgreSQLEvent::from_domain(&event).unwrap();
        let later = event.updated_at + Duration::minutes(5);
        row.updated_at = later;

        let restored = row.to_domain().unwrap();
        assert_eq!(restored.updated_at, later);
        assert_eq!(restored.detail, "bus ride");
    }

    #[test]
    fn test_corrupt_document_is_storage_error() {
        let row = PostgreSQLPatient {
            id: "5f1d7a3b9c2e4f6a8b0c1d2e".to_string(),
            document: serde_json::json!({"gender": "unknown"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = row.to_domain().unwrap_err();
        assert!(matches!(err, ExposureError::Storage(_)));
    }
}
