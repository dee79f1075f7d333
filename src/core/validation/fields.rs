//! Field-level validation
//!
//! Checks a whole candidate record, given as a JSON object, against the static
//! field rules of its entity. Every rule is evaluated so a report lists all
//! violations at once; a clean record is returned as a normalized draft.

use crate::domain::errors::ExposureError;
use crate::domain::event::{EventDraft, LocationType};
use crate::domain::ids::RecordId;
use crate::domain::patient::{Gender, PatientDraft};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const INVALID_DATE_MESSAGE: &str = "invalid date and time";
pub const TIME_ORDER_MESSAGE: &str = "timeTo must be >= timeFrom";
pub const INVALID_AGE_MESSAGE: &str = "invalid age";
pub const MISSING_LOCATION_MESSAGE: &str = "location is required for indoor and outdoor events";

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Wire name of the offending field
    pub field: String,
    pub message: String,
}

/// Outcome of validating one candidate record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True if any violation concerns `field`
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl From<ValidationReport> for ExposureError {
    fn from(report: ValidationReport) -> Self {
        ExposureError::Validation(report.to_string())
    }
}

/// Earliest instant an event may start or end at
pub fn earliest_event_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(\d{4})([-/])(\d{1,2})([-/])(\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?(Z|z|[+-]\d{2}:?\d{2})?)?$",
        )
        .expect("date pattern is a valid regex")
    })
}

/// Parses an event timestamp
///
/// Accepts `YYYY-MM-DD` or `YYYY/MM/DD` (one delimiter throughout), optionally
/// followed by a `T` or space and `HH:MM[:SS[.fraction]]`, optionally followed
/// by `Z` or a `±HH:MM` offset. Values without an offset are read as UTC.
/// Instants before 2020-01-01T00:00:00Z are rejected.
///
/// # Examples
///
/// ```
/// use exposure::core::validation::parse_event_time;
///
/// assert!(parse_event_time("2020-03-01T10:00:00Z").is_ok());
/// assert!(parse_event_time("2020/03/01 10:00").is_ok());
/// assert!(parse_event_time("2019-12-31").is_err());
/// assert!(parse_event_time("yesterday").is_err());
/// ```
pub fn parse_event_time(value: &str) -> Result<DateTime<Utc>, String> {
    let invalid = || INVALID_DATE_MESSAGE.to_string();

    let caps = date_pattern().captures(value.trim()).ok_or_else(invalid)?;
    if caps[2] != caps[4] {
        return Err(invalid());
    }

    let number = |idx: usize| -> Option<u32> { caps.get(idx).map(|m| m.as_str().parse().ok())? };

    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, number(3).ok_or_else(invalid)?, number(5).ok_or_else(invalid)?)
        .ok_or_else(invalid)?;

    let time = match caps.get(6) {
        Some(_) => {
            let nanos = match caps.get(9) {
                Some(fraction) => {
                    let digits = format!("{:0<9}", fraction.as_str());
                    digits.parse::<u32>().map_err(|_| invalid())?
                }
                None => 0,
            };
            NaiveTime::from_hms_nano_opt(
                number(6).ok_or_else(invalid)?,
                number(7).ok_or_else(invalid)?,
                number(8).unwrap_or(0),
                nanos,
            )
            .ok_or_else(invalid)?
        }
        None => NaiveTime::MIN,
    };

    let naive = NaiveDateTime::new(date, time);
    let instant = match caps.get(10).map(|m| m.as_str()) {
        None | Some("Z") | Some("z") => Utc.from_utc_datetime(&naive),
        Some(offset) => {
            let offset = parse_offset(offset).ok_or_else(invalid)?;
            offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(invalid)?
                .with_timezone(&Utc)
        }
    };

    if instant < earliest_event_time() {
        return Err(invalid());
    }

    Ok(instant)
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses a patient age
///
/// Whole non-negative numbers are accepted, including floats such as `24.0`
/// and numeric strings such as `"24"`.
pub fn parse_age(value: &Value) -> Result<u32, String> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => {
            Ok(n as u32)
        }
        _ => Err(INVALID_AGE_MESSAGE.to_string()),
    }
}

/// Reads a required string field, trimmed
fn required_str(
    doc: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Option<String> {
    match optional_str(doc, field, report) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            report.push(field, format!("{field} is required"));
            None
        }
        Err(()) => None,
    }
}

/// Reads an optional string field, trimmed; blank counts as absent
fn optional_str(
    doc: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Result<Option<String>, ()> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => {
            report.push(field, format!("{field} must be a string"));
            Err(())
        }
    }
}

fn required_time(
    doc: &Map<String, Value>,
    field: &str,
    report: &mut ValidationReport,
) -> Option<DateTime<Utc>> {
    let raw = required_str(doc, field, report)?;
    match parse_event_time(&raw) {
        Ok(instant) => Some(instant),
        Err(message) => {
            report.push(field, message);
            None
        }
    }
}

/// Validates a candidate event
///
/// # Errors
///
/// Returns the full list of violations if any rule fails.
pub fn validate_event(doc: &Map<String, Value>) -> Result<EventDraft, ValidationReport> {
    let mut report = ValidationReport::new();

    let time_from = required_time(doc, "timeFrom", &mut report);
    let time_to = required_time(doc, "timeTo", &mut report);
    if let (Some(from), Some(to)) = (time_from, time_to) {
        if to < from {
            report.push("timeTo", TIME_ORDER_MESSAGE);
        }
    }

    let detail = required_str(doc, "detail", &mut report);

    let location_type = required_str(doc, "locationType", &mut report).and_then(|raw| {
        LocationType::from_str(&raw)
            .map_err(|message| report.push("locationType", message))
            .ok()
    });

    let location = optional_str(doc, "location", &mut report).unwrap_or(None);
    if location.is_none()
        && location_type.is_some_and(|t| t.requires_location())
        && !report.has_violation("location")
    {
        report.push("location", MISSING_LOCATION_MESSAGE);
    }

    let patient_id = required_str(doc, "patientId", &mut report).and_then(|raw| {
        RecordId::new(raw)
            .map_err(|_| report.push("patientId", "patientId is invalid"))
            .ok()
    });

    match (time_from, time_to, detail, location_type, patient_id) {
        (Some(time_from), Some(time_to), Some(detail), Some(location_type), Some(patient_id))
            if report.is_ok() =>
        {
            Ok(EventDraft {
                time_from,
                time_to,
                detail,
                location_type,
                location,
                patient_id,
            })
        }
        _ => Err(report),
    }
}

/// Validates a candidate patient
///
/// # Errors
///
/// Returns the full list of violations if any rule fails.
pub fn validate_patient(doc: &Map<String, Value>) -> Result<PatientDraft, ValidationReport> {
    let mut report = ValidationReport::new();

    let gender = required_str(doc, "gender", &mut report).and_then(|raw| {
        Gender::from_str(&raw)
            .map_err(|message| report.push("gender", message))
            .ok()
    });

    let age = match doc.get("age") {
        None | Some(Value::Null) => {
            report.push("age", "age is required");
            None
        }
        Some(value) => parse_age(value)
            .map_err(|message| report.push("age", message))
            .ok(),
    };

    let occupation = required_str(doc, "occupation", &mut report);

    match (gender, age, occupation) {
        (Some(gender), Some(age), Some(occupation)) if report.is_ok() => {
            Ok(PatientDraft::new(gender, age, occupation))
        }
        _ => Err(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn valid_event() -> Value {
        json!({
            "timeFrom": "2020-03-01T10:00:00Z",
            "timeTo": "2020-03-01T11:00:00Z",
            "detail": "  visited the pharmacy ",
            "locationType": "Indoor",
            "location": " Main Street ",
            "patientId": "5f1d7a3b9c2e4f6a8b0c1d2e"
        })
    }

    #[test]
    fn test_parse_event_time_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_event_time("2020-03-01T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_event_time("2020-03-01 10:00").unwrap(), expected);
        assert_eq!(parse_event_time("2020/03/01T10:00:00").unwrap(), expected);
        assert_eq!(parse_event_time("2020-03-01T12:00:00+02:00").unwrap(), expected);
        assert_eq!(
            parse_event_time("2020-03-01").unwrap(),
            Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_event_time_fractional_seconds() {
        let parsed = parse_event_time("2020-03-01T10:00:00.250Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_event_time_lower_bound_is_inclusive() {
        assert!(parse_event_time("2020-01-01T00:00:00Z").is_ok());
        assert!(parse_event_time("2019-12-31T23:59:59Z").is_err());
        // Offset pushes the instant before the cutoff
        assert!(parse_event_time("2020-01-01T00:30:00+01:00").is_err());
    }

    #[test]
    fn test_parse_event_time_rejects_malformed() {
        for raw in [
            "",
            "not a date",
            "2020.03.01",
            "2020-03/01",
            "2020-02-30",
            "2020-13-01",
            "2020-03-01T25:00",
            "03-01-2020",
            "2020-03-01T10:00 Z",
            "2020-03-01T10:00:00 +02:00",
        ] {
            assert_eq!(
                parse_event_time(raw).unwrap_err(),
                INVALID_DATE_MESSAGE,
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_validate_event_normalizes_fields() {
        let draft = validate_event(&object(valid_event())).unwrap();
        assert_eq!(draft.detail, "visited the pharmacy");
        assert_eq!(draft.location_type, LocationType::Indoor);
        assert_eq!(draft.location.as_deref(), Some("Main Street"));
        assert_eq!(draft.patient_id.as_str(), "5f1d7a3b9c2e4f6a8b0c1d2e");
    }

    #[test]
    fn test_validate_event_accepts_zero_length_window() {
        let mut doc = object(valid_event());
        doc.insert("timeTo".to_string(), json!("2020-03-01T10:00:00Z"));
        assert!(validate_event(&doc).is_ok());
    }

    #[test]
    fn test_validate_event_rejects_reversed_window() {
        let mut doc = object(valid_event());
        doc.insert("timeTo".to_string(), json!("2020-03-01T09:00:00Z"));

        let report = validate_event(&doc).unwrap_err();
        assert_eq!(report.to_string(), TIME_ORDER_MESSAGE);
    }

    #[test]
    fn test_validate_event_rejects_dates_before_2020() {
        let mut doc = object(valid_event());
        doc.insert("timeFrom".to_string(), json!("2019-06-01"));

        let report = validate_event(&doc).unwrap_err();
        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].field, "timeFrom");
        assert_eq!(report.to_string(), INVALID_DATE_MESSAGE);
    }

    #[test]
    fn test_validate_event_location_required_indoor_outdoor() {
        for location_type in ["indoor", "OUTDOOR"] {
            let mut doc = object(valid_event());
            doc.insert("locationType".to_string(), json!(location_type));
            doc.insert("location".to_string(), json!("   "));

            let report = validate_event(&doc).unwrap_err();
            assert_eq!(report.to_string(), MISSING_LOCATION_MESSAGE);
        }
    }

    #[test]
    fn test_validate_event_location_optional_home_travelling() {
        for location_type in ["home", "travelling"] {
            let mut doc = object(valid_event());
            doc.insert("locationType".to_string(), json!(location_type));
            doc.remove("location");

            let draft = validate_event(&doc).unwrap();
            assert!(draft.location.is_none());
        }
    }

    #[test]
    fn test_validate_event_rejects_unknown_location_type() {
        let mut doc = object(valid_event());
        doc.insert("locationType".to_string(), json!("submarine"));

        let report = validate_event(&doc).unwrap_err();
        assert_eq!(
            report.to_string(),
            "the location type submarine is not supported"
        );
    }

    #[test]
    fn test_validate_event_reports_every_violation() {
        let report = validate_event(&Map::new()).unwrap_err();
        for field in ["timeFrom", "timeTo", "detail", "locationType", "patientId"] {
            assert!(report.has_violation(field), "missing violation for {field}");
        }
    }

    #[test]
    fn test_validate_event_rejects_short_patient_id() {
        let mut doc = object(valid_event());
        doc.insert("patientId".to_string(), json!("abc"));

        let report = validate_event(&doc).unwrap_err();
        assert_eq!(report.to_string(), "patientId is invalid");
    }

    #[test]
    fn test_validate_event_rejects_non_string_fields() {
        let mut doc = object(valid_event());
        doc.insert("detail".to_string(), json!(42));

        let report = validate_event(&doc).unwrap_err();
        assert_eq!(report.to_string(), "detail must be a string");
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age(&json!(24)).unwrap(), 24);
        assert_eq!(parse_age(&json!(24.0)).unwrap(), 24);
        assert_eq!(parse_age(&json!("24")).unwrap(), 24);
        assert_eq!(parse_age(&json!(0)).unwrap(), 0);
        assert!(parse_age(&json!(24.5)).is_err());
        assert!(parse_age(&json!(-1)).is_err());
        assert!(parse_age(&json!("old")).is_err());
        assert!(parse_age(&json!(true)).is_err());
    }

    #[test]
    fn test_validate_patient_normalizes() {
        let draft = validate_patient(&object(json!({
            "gender": "FeMale",
            "age": 33.0,
            "occupation": "  Software Engineer "
        })))
        .unwrap();

        assert_eq!(draft.gender, Gender::Female);
        assert_eq!(draft.age, 33);
        assert_eq!(draft.occupation, "software engineer");
    }

    #[test]
    fn test_validate_patient_rejects_bad_values() {
        let report = validate_patient(&object(json!({
            "gender": "other",
            "age": -3,
            "occupation": ""
        })))
        .unwrap_err();

        assert!(report.has_violation("gender"));
        assert!(report.has_violation("age"));
        assert!(report.has_violation("occupation"));
        assert!(report.to_string().contains("invalid age"));
    }

    #[test]
    fn test_report_converts_to_validation_error() {
        let mut report = ValidationReport::new();
        report.push("age", INVALID_AGE_MESSAGE);
        let err: ExposureError = report.into();
        assert!(matches!(err, ExposureError::Validation(ref m) if m == "invalid age"));
    }
}
