//! Domain models and types for Exposure.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record identifiers** ([`RecordId`]) with the 24-character shape rule
//! - **Domain models** ([`Patient`], [`Event`]) and their validated drafts
//! - **Error types** ([`ExposureError`])
//! - **Result type alias** ([`Result`])
//!
//! # Ownership
//!
//! A Patient owns zero or more Events one-to-many through `patientId`. Events
//! hold only the id; nothing enforces that the Patient exists.
//!
//! ```rust
//! use exposure::domain::{RecordId, Gender, PatientDraft};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient_id = RecordId::new("5f1d7a3b9c2e4f6a8b0c1d2e")?;
//! let draft = PatientDraft::new(Gender::Male, 30, "Driver");
//! assert_eq!(draft.occupation, "driver");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod event;
pub mod ids;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::ExposureError;
pub use event::{Event, EventDraft, LocationType, TimeWindow, EVENT_UPDATABLE_FIELDS};
pub use ids::RecordId;
pub use patient::{Gender, Patient, PatientDraft, PATIENT_UPDATABLE_FIELDS};
pub use result::Result;
