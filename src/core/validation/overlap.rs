//! Time-window conflict detection between events of one patient

use crate::domain::errors::ExposureError;
use crate::domain::event::TimeWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const OVERLAP_MESSAGE: &str = "invalid to or from time";

/// How two event windows are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMode {
    /// A conflict exists when either endpoint of the candidate lies strictly
    /// inside an existing window. Endpoints landing exactly on a boundary and
    /// candidates that fully enclose an existing window are admitted.
    #[default]
    Endpoints,

    /// Any shared instant beyond a touching boundary is a conflict, including
    /// identical and enclosing windows
    Strict,
}

impl OverlapMode {
    /// Returns true if `candidate` conflicts with `existing`
    pub fn conflicts(&self, candidate: &TimeWindow, existing: &TimeWindow) -> bool {
        match self {
            OverlapMode::Endpoints => {
                let inside = |t: DateTime<Utc>| existing.from < t && t < existing.to;
                inside(candidate.from) || inside(candidate.to)
            }
            OverlapMode::Strict => candidate.from < existing.to && existing.from < candidate.to,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapMode::Endpoints => "endpoints",
            OverlapMode::Strict => "strict",
        }
    }
}

impl fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverlapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "endpoints" => Ok(OverlapMode::Endpoints),
            "strict" => Ok(OverlapMode::Strict),
            other => Err(format!(
                "Invalid overlap mode '{other}'. Must be one of: endpoints, strict"
            )),
        }
    }
}

/// Returns the first existing window the candidate conflicts with
pub fn find_conflict<'a, I>(
    candidate: &TimeWindow,
    existing: I,
    mode: OverlapMode,
) -> Option<&'a TimeWindow>
where
    I: IntoIterator<Item = &'a TimeWindow>,
{
    existing
        .into_iter()
        .find(|window| mode.conflicts(candidate, window))
}

/// Fails with an overlap error if the candidate conflicts with any window
///
/// # Examples
///
/// ```
/// use exposure::core::validation::{check_overlap, OverlapMode};
/// use exposure::domain::TimeWindow;
/// use chrono::{TimeZone, Utc};
///
/// let at = |h: u32, m: u32| Utc.with_ymd_and_hms(2020, 3, 1, h, m, 0).unwrap();
/// let existing = [TimeWindow::new(at(10, 0), at(11, 0))];
///
/// let inner = TimeWindow::new(at(10, 30), at(10, 45));
/// assert!(check_overlap(&inner, &existing, OverlapMode::Endpoints).is_err());
///
/// let enclosing = TimeWindow::new(at(9, 30), at(12, 0));
/// assert!(check_overlap(&enclosing, &existing, OverlapMode::Endpoints).is_ok());
/// assert!(check_overlap(&enclosing, &existing, OverlapMode::Strict).is_err());
/// ```
pub fn check_overlap(
    candidate: &TimeWindow,
    existing: &[TimeWindow],
    mode: OverlapMode,
) -> Result<(), ExposureError> {
    match find_conflict(candidate, existing, mode) {
        Some(_) => Err(ExposureError::Overlap(OVERLAP_MESSAGE.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 1, hour, minute, 0).unwrap()
    }

    fn window(from: (u32, u32), to: (u32, u32)) -> TimeWindow {
        TimeWindow::new(at(from.0, from.1), at(to.0, to.1))
    }

    fn existing() -> TimeWindow {
        window((10, 0), (11, 0))
    }

    #[test]
    fn test_endpoints_inside_conflict() {
        let mode = OverlapMode::Endpoints;

        assert!(mode.conflicts(&window((10, 30), (10, 45)), &existing()));
        assert!(mode.conflicts(&window((10, 30), (12, 0)), &existing()));
        assert!(mode.conflicts(&window((9, 0), (10, 30)), &existing()));
    }

    #[test]
    fn test_endpoints_admits_disjoint_window() {
        assert!(!OverlapMode::Endpoints.conflicts(&window((9, 0), (9, 30)), &existing()));
    }

    #[test]
    fn test_endpoints_admits_boundary_coincidence() {
        let mode = OverlapMode::Endpoints;

        assert!(!mode.conflicts(&window((11, 0), (12, 0)), &existing()));
        assert!(!mode.conflicts(&window((9, 0), (10, 0)), &existing()));
        assert!(!mode.conflicts(&existing(), &existing()));
    }

    #[test]
    fn test_endpoints_admits_enclosing_window() {
        assert!(!OverlapMode::Endpoints.conflicts(&window((9, 30), (12, 0)), &existing()));
    }

    #[test]
    fn test_strict_mode() {
        let mode = OverlapMode::Strict;

        assert!(mode.conflicts(&window((9, 30), (12, 0)), &existing()));
        assert!(mode.conflicts(&existing(), &existing()));
        assert!(mode.conflicts(&window((10, 30), (10, 45)), &existing()));
        assert!(!mode.conflicts(&window((11, 0), (12, 0)), &existing()));
        assert!(!mode.conflicts(&window((9, 0), (10, 0)), &existing()));
        assert!(!mode.conflicts(&window((9, 0), (9, 30)), &existing()));
    }

    #[test]
    fn test_find_conflict_returns_first_match() {
        let windows = vec![
            window((1, 0), (2, 0)),
            window((10, 0), (11, 0)),
            window((10, 0), (12, 0)),
        ];
        let hit = find_conflict(&window((10, 30), (10, 30)), &windows, OverlapMode::Endpoints);
        assert_eq!(hit, Some(&windows[1]));
        assert!(find_conflict(&window((5, 0), (6, 0)), &windows, OverlapMode::Endpoints).is_none());
    }

    #[test]
    fn test_check_overlap_error_message() {
        let err = check_overlap(&window((10, 15), (10, 20)), &[existing()], OverlapMode::Endpoints)
            .unwrap_err();
        assert_eq!(err.to_string(), OVERLAP_MESSAGE);
        assert!(matches!(err, ExposureError::Overlap(_)));
    }

    #[test]
    fn test_overlap_mode_parse_and_serde() {
        assert_eq!(OverlapMode::from_str("STRICT").unwrap(), OverlapMode::Strict);
        assert!(OverlapMode::from_str("loose").is_err());
        assert_eq!(OverlapMode::default(), OverlapMode::Endpoints);

        let mode: OverlapMode = serde_json::from_str("\"endpoints\"").unwrap();
        assert_eq!(mode, OverlapMode::Endpoints);
    }
}
