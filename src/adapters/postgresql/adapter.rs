//! PostgreSQL adapter implementing database traits
//!
//! This module provides the implementation of DatabaseClient, PatientStore
//! and EventStore for PostgreSQL.

use crate::adapters::database::traits::{DatabaseClient, EventStore, PatientStore};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{PostgreSQLEvent, PostgreSQLPatient};
use crate::domain::event::{Event, EventDraft};
use crate::domain::ids::RecordId;
use crate::domain::patient::{Patient, PatientDraft};
use crate::domain::{ExposureError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

const PATIENT_COLUMNS: &str = "id, document, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, patient_id, document, created_at, updated_at";

/// PostgreSQL implementation of the storage traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Create a new PostgreSQL adapter with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    async fn query_patients(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Patient>> {
        let rows = self.client.query(query, params).await?;
        rows.iter()
            .map(|row| PostgreSQLPatient::from_row(row)?.to_domain())
            .collect()
    }

    async fn query_events(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Event>> {
        let rows = self.client.query(query, params).await?;
        rows.iter()
            .map(|row| PostgreSQLEvent::from_row(row)?.to_domain())
            .collect()
    }
}

#[async_trait]
impl DatabaseClient for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }
}

#[async_trait]
impl PatientStore for PostgreSQLAdapter {
    async fn insert_patient(&self, draft: PatientDraft) -> Result<Patient> {
        let patient = Patient::from_draft(RecordId::generate(), draft, Utc::now());
        let row = PostgreSQLPatient::from_domain(&patient)?;

        self.client
            .execute(
                "INSERT INTO patients (id, document, created_at, updated_at) VALUES ($1, $2, $3, $4)",
                &[&row.id, &row.document, &row.created_at, &row.updated_at],
            )
            .await?;

        tracing::debug!(patient_id = %patient.id, "Patient inserted into PostgreSQL");
        Ok(patient)
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at, id");
        self.query_patients(&query, &[]).await
    }

    async fn count_patients(&self) -> Result<u64> {
        let rows = self
            .client
            .query("SELECT COUNT(*) AS total FROM patients", &[])
            .await?;
        let total: i64 = match rows.first() {
            Some(row) => row.try_get("total")?,
            None => 0,
        };
        Ok(total.max(0) as u64)
    }

    async fn find_patient(&self, id: &RecordId) -> Result<Option<Patient>> {
        let query = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1");
        let mut patients = self.query_patients(&query, &[&id.as_str()]).await?;
        Ok(patients.pop())
    }

    async fn save_patient(&self, patient: &Patient) -> Result<Patient> {
        let mut saved = patient.clone();
        saved.updated_at = Utc::now();
        let row = PostgreSQLPatient::from_domain(&saved)?;

        let updated = self
            .client
            .execute(
                "UPDATE patients SET document = $2, updated_at = $3 WHERE id = $1",
                &[&row.id, &row.document, &row.updated_at],
            )
            .await?;

        if updated == 0 {
            return Err(ExposureError::NotFound(format!(
                "patient on id {} doesn't exist",
                patient.id
            )));
        }

        tracing::debug!(patient_id = %saved.id, "Patient saved to PostgreSQL");
        Ok(saved)
    }

    async fn delete_patient(&self, id: &RecordId) -> Result<bool> {
        let removed = self
            .client
            .execute("DELETE FROM patients WHERE id = $1", &[&id.as_str()])
            .await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl EventStore for PostgreSQLAdapter {
    async fn insert_event(&self, draft: EventDraft) -> Result<Event> {
        let event = Event::from_draft(RecordId::generate(), draft, Utc::now());
        let row = PostgreSQLEvent::from_domain(&event)?;

        self.client
            .execute(
                r#"
                INSERT INTO events (id, patient_id, document, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
                &[
                    &row.id,
                    &row.patient_id,
                    &row.document,
                    &row.created_at,
                    &row.updated_at,
                ],
            )
            .await?;

        tracing::debug!(
            event_id = %event.id,
            patient_id = %event.patient_id,
            "Event inserted into PostgreSQL"
        );
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at, id");
        self.query_events(&query, &[]).await
    }

    async fn find_event(&self, id: &RecordId) -> Result<Option<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let mut events = self.query_events(&query, &[&id.as_str()]).await?;
        Ok(events.pop())
    }

    async fn find_events_by_patient(&self, patient_id: &RecordId) -> Result<Vec<Event>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE patient_id = $1 ORDER BY created_at, id"
        );
        self.query_events(&query, &[&patient_id.as_str()]).await
    }

    async fn save_event(&self, event: &Event) -> Result<Event> {
        let mut saved = event.clone();
        saved.updated_at = Utc::now();
        let row = PostgreSQLEvent::from_domain(&saved)?;

        let updated = self
            .client
            .execute(
                "UPDATE events SET patient_id = $2, document = $3, updated_at = $4 WHERE id = $1",
                &[&row.id, &row.patient_id, &row.document, &row.updated_at],
            )
            .await?;

        if updated == 0 {
            return Err(ExposureError::NotFound(format!(
                "event on id {} doesn't exist",
                event.id
            )));
        }

        tracing::debug!(event_id = %saved.id, "Event saved to PostgreSQL");
        Ok(saved)
    }

    async fn delete_event(&self, id: &RecordId) -> Result<bool> {
        let removed = self
            .client
            .execute("DELETE FROM events WHERE id = $1", &[&id.as_str()])
            .await?;
        Ok(removed > 0)
    }

    async fn delete_events_by_patient(&self, patient_id: &RecordId) -> Result<u64> {
        let removed = self
            .client
            .execute(
                "DELETE FROM events WHERE patient_id = $1",
                &[&patient_id.as_str()],
            )
            .await?;

        tracing::debug!(
            patient_id = %patient_id,
            removed,
            "Events removed from PostgreSQL"
        );
        Ok(removed)
    }
}
