//! Database abstraction traits
//!
//! This module defines the traits that storage adapters must implement
//! to persist patients and events.

use crate::domain::event::{Event, EventDraft};
use crate::domain::ids::RecordId;
use crate::domain::patient::{Patient, PatientDraft};
use crate::domain::Result;
use async_trait::async_trait;

/// Connection-level operations of a storage backend
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Test the database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the patient and event collections exist
    ///
    /// Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Get the database name
    fn database_name(&self) -> &str;
}

/// Patient persistence
///
/// Implementations assign the id and both timestamps on insert and refresh
/// `updated_at` on save.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Persist a new patient
    async fn insert_patient(&self, draft: PatientDraft) -> Result<Patient>;

    /// All patients in insertion order
    async fn list_patients(&self) -> Result<Vec<Patient>>;

    async fn count_patients(&self) -> Result<u64>;

    /// Returns `Ok(None)` if no patient has this id
    async fn find_patient(&self, id: &RecordId) -> Result<Option<Patient>>;

    /// Overwrite a stored patient with new field values
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the patient was removed in the meantime.
    async fn save_patient(&self, patient: &Patient) -> Result<Patient>;

    /// Returns whether a record was removed
    async fn delete_patient(&self, id: &RecordId) -> Result<bool>;
}

/// Event persistence
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event
    async fn insert_event(&self, draft: EventDraft) -> Result<Event>;

    /// All events in insertion order
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Returns `Ok(None)` if no event has this id
    async fn find_event(&self, id: &RecordId) -> Result<Option<Event>>;

    /// Events owned by a patient, possibly none
    async fn find_events_by_patient(&self, patient_id: &RecordId) -> Result<Vec<Event>>;

    /// Overwrite a stored event with new field values
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the event was removed in the meantime.
    async fn save_event(&self, event: &Event) -> Result<Event>;

    /// Returns whether a record was removed
    async fn delete_event(&self, id: &RecordId) -> Result<bool>;

    /// Removes every event owned by a patient, returning how many were removed
    async fn delete_events_by_patient(&self, patient_id: &RecordId) -> Result<u64>;
}
