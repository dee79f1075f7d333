//! Domain validation
//!
//! Pure functions with no storage access: field rules for patients and
//! events, timestamp parsing and time-window conflict detection.

pub mod fields;
pub mod overlap;

pub use fields::{
    earliest_event_time, parse_age, parse_event_time, validate_event, validate_patient,
    ValidationReport, Violation,
};
pub use overlap::{check_overlap, find_conflict, OverlapMode, OVERLAP_MESSAGE};
