//! Event operations

use super::{as_document, merge_update, parse_id, LookupScope, RecordManager, UpdateOutcome};
use crate::core::validation::{check_overlap, validate_event};
use crate::domain::event::{Event, EventDraft, TimeWindow, EVENT_UPDATABLE_FIELDS};
use crate::domain::ids::RecordId;
use crate::domain::{ExposureError, Result};
use crate::{log_record_created, log_record_removed};
use serde_json::Value;

const EVENT_NOT_FOUND: &str = "no event is found";

impl RecordManager {
    /// All events
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.events.list_events().await
    }

    /// Events matching `id` under the given scope
    ///
    /// Record scope yields at most one event and fails when there is none.
    /// Patient scope yields the patient's events, possibly none.
    pub async fn find_events(&self, id: &str, scope: LookupScope) -> Result<Vec<Event>> {
        let id = parse_id(id)?;
        match scope {
            LookupScope::Record => {
                let event = self
                    .events
                    .find_event(&id)
                    .await?
                    .ok_or_else(|| ExposureError::NotFound(EVENT_NOT_FOUND.to_string()))?;
                Ok(vec![event])
            }
            LookupScope::Patient => self.events.find_events_by_patient(&id).await,
        }
    }

    /// Validates and stores a new event
    ///
    /// # Errors
    ///
    /// `Validation` for bad fields, `Overlap` if the window conflicts with
    /// another event of the same patient.
    pub async fn create_event(&self, payload: &Value) -> Result<Event> {
        let draft = validate_event(as_document(payload)?)?;
        self.ensure_no_overlap(&draft, None).await?;

        let event = self.events.insert_event(draft).await?;

        log_record_created!("event", &event.id);
        Ok(event)
    }

    /// Applies a whitelisted partial update
    ///
    /// The merged record is re-validated with the full field rules. The
    /// overlap check only runs when `recheck_overlap_on_update` is set, and
    /// then ignores the event being updated.
    pub async fn update_event(&self, id: &str, body: Value) -> Result<UpdateOutcome<Event>> {
        let id = parse_id(id)?;
        let origin = self.events.find_event(&id).await?.ok_or_else(|| {
            ExposureError::NotFound(format!("event on id {id} doesn't exist"))
        })?;

        let merged = merge_update(origin.fields(), &body, &EVENT_UPDATABLE_FIELDS)?;
        let draft = validate_event(&merged)?;

        if self.policy.recheck_overlap_on_update {
            self.ensure_no_overlap(&draft, Some(&id)).await?;
        }

        let mut candidate = origin.clone();
        candidate.apply(draft);
        let updated = self.events.save_event(&candidate).await?;

        tracing::info!(event_id = %id, "Event updated");
        Ok(UpdateOutcome {
            origin,
            updated,
            request: body,
        })
    }

    /// Removes one event, returning it
    pub async fn delete_event(&self, id: &str) -> Result<Event> {
        let id = parse_id(id)?;
        let event = self
            .events
            .find_event(&id)
            .await?
            .ok_or_else(|| ExposureError::NotFound(EVENT_NOT_FOUND.to_string()))?;

        if !self.events.delete_event(&id).await? {
            return Err(ExposureError::NotFound(EVENT_NOT_FOUND.to_string()));
        }

        log_record_removed!("event", &id);
        Ok(event)
    }

    async fn ensure_no_overlap(&self, draft: &EventDraft, exclude: Option<&RecordId>) -> Result<()> {
        let windows: Vec<TimeWindow> = self
            .events
            .find_events_by_patient(&draft.patient_id)
            .await?
            .iter()
            .filter(|event| Some(&event.id) != exclude)
            .map(Event::window)
            .collect();

        check_overlap(&draft.window(), &windows, self.policy.overlap_mode).map_err(|err| {
            tracing::warn!(
                patient_id = %draft.patient_id,
                existing = windows.len(),
                mode = %self.policy.overlap_mode,
                "Event window conflicts with an existing event"
            );
            err
        })
    }
}
