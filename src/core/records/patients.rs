//! Patient operations

use super::{as_document, merge_update, parse_id, RecordManager, UpdateOutcome};
use crate::core::validation::validate_patient;
use crate::domain::patient::{Patient, PATIENT_UPDATABLE_FIELDS};
use crate::domain::{ExposureError, Result};
use crate::{log_record_created, log_record_removed};
use serde_json::Value;

const PATIENT_NOT_FOUND: &str = "no patient is found";

impl RecordManager {
    /// All patients
    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        self.patients.list_patients().await
    }

    /// One patient by id
    ///
    /// # Errors
    ///
    /// `InvalidId` for a malformed id, `NotFound` if no patient matches.
    pub async fn get_patient(&self, id: &str) -> Result<Patient> {
        let id = parse_id(id)?;
        self.patients
            .find_patient(&id)
            .await?
            .ok_or_else(|| ExposureError::NotFound(PATIENT_NOT_FOUND.to_string()))
    }

    /// Validates and stores a new patient
    ///
    /// # Errors
    ///
    /// `Capacity` once `max_patients` exist, `Validation` for bad fields.
    pub async fn create_patient(&self, payload: &Value) -> Result<Patient> {
        let count = self.patients.count_patients().await?;
        if count >= self.policy.max_patients {
            tracing::warn!(
                count,
                limit = self.policy.max_patients,
                "Patient creation rejected by population cap"
            );
            return Err(ExposureError::Capacity(format!(
                "number of patients should be less than {}",
                self.policy.max_patients
            )));
        }

        let draft = validate_patient(as_document(payload)?)?;
        let patient = self.patients.insert_patient(draft).await?;

        log_record_created!("patient", &patient.id);
        Ok(patient)
    }

    /// Applies a whitelisted partial update
    ///
    /// The merged record is re-validated with the full field rules before it
    /// is saved.
    ///
    /// # Errors
    ///
    /// `InvalidId`, `NotFound`, `InvalidField` for keys outside
    /// gender/age/occupation, `Validation` for bad values.
    pub async fn update_patient(&self, id: &str, body: Value) -> Result<UpdateOutcome<Patient>> {
        let id = parse_id(id)?;
        let origin = self.patients.find_patient(&id).await?.ok_or_else(|| {
            ExposureError::NotFound(format!("patient on id {id} doesn't exist"))
        })?;

        let merged = merge_update(origin.fields(), &body, &PATIENT_UPDATABLE_FIELDS)?;
        let draft = validate_patient(&merged)?;

        let mut candidate = origin.clone();
        candidate.apply(draft);
        let updated = self.patients.save_patient(&candidate).await?;

        tracing::info!(patient_id = %id, "Patient updated");
        Ok(UpdateOutcome {
            origin,
            updated,
            request: body,
        })
    }

    /// Removes a patient and every event it owns, events first
    ///
    /// Returns the removed patient.
    pub async fn delete_patient(&self, id: &str) -> Result<Patient> {
        let id = parse_id(id)?;
        let patient = self
            .patients
            .find_patient(&id)
            .await?
            .ok_or_else(|| ExposureError::NotFound(PATIENT_NOT_FOUND.to_string()))?;

        let cascaded = self.events.delete_events_by_patient(&id).await?;
        if !self.patients.delete_patient(&id).await? {
            return Err(ExposureError::NotFound(PATIENT_NOT_FOUND.to_string()));
        }

        log_record_removed!("patient", &id, cascaded);
        Ok(patient)
    }
}
