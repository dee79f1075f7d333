//! In-memory implementation of the storage traits

use crate::adapters::database::traits::{DatabaseClient, EventStore, PatientStore};
use crate::domain::event::{Event, EventDraft};
use crate::domain::ids::RecordId;
use crate::domain::patient::{Patient, PatientDraft};
use crate::domain::{ExposureError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Patients and events held in insertion order
///
/// Cloning shares the underlying collections. Each trait call takes the lock
/// for that call only; nothing spans several calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    patients: Arc<RwLock<Vec<Patient>>>,
    events: Arc<RwLock<Vec<Event>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseClient for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    fn database_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn insert_patient(&self, draft: PatientDraft) -> Result<Patient> {
        let patient = Patient::from_draft(RecordId::generate(), draft, Utc::now());
        self.patients.write().await.push(patient.clone());
        Ok(patient)
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        Ok(self.patients.read().await.clone())
    }

    async fn count_patients(&self) -> Result<u64> {
        Ok(self.patients.read().await.len() as u64)
    }

    async fn find_patient(&self, id: &RecordId) -> Result<Option<Patient>> {
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| &p.id == id).cloned())
    }

    async fn save_patient(&self, patient: &Patient) -> Result<Patient> {
        let mut patients = self.patients.write().await;
        let slot = patients
            .iter_mut()
            .find(|p| p.id == patient.id)
            .ok_or_else(|| {
                ExposureError::NotFound(format!("patient on id {} doesn't exist", patient.id))
            })?;

        let mut saved = patient.clone();
        saved.created_at = slot.created_at;
        saved.updated_at = Utc::now();
        *slot = saved.clone();
        Ok(saved)
    }

    async fn delete_patient(&self, id: &RecordId) -> Result<bool> {
        let mut patients = self.patients.write().await;
        let before = patients.len();
        patients.retain(|p| &p.id != id);
        Ok(patients.len() < before)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, draft: EventDraft) -> Result<Event> {
        let event = Event::from_draft(RecordId::generate(), draft, Utc::now());
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn find_event(&self, id: &RecordId) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| &e.id == id).cloned())
    }

    async fn find_events_by_patient(&self, patient_id: &RecordId) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| &e.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn save_event(&self, event: &Event) -> Result<Event> {
        let mut events = self.events.write().await;
        let slot = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| {
                ExposureError::NotFound(format!("event on id {} doesn't exist", event.id))
            })?;

        let mut saved = event.clone();
        saved.created_at = slot.created_at;
        saved.updated_at = Utc::now();
        *slot = saved.clone();
        Ok(saved)
    }

    async fn delete_event(&self, id: &RecordId) -> Result<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| &e.id != id);
        Ok(events.len() < before)
    }

    async fn delete_events_by_patient(&self, patient_id: &RecordId) -> Result<u64> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| &e.patient_id != patient_id);
        Ok((before - events.len()) as u64)
    }
}
