//! Input validation for invigilation scheduling.
//!
//! Checks structural integrity of a roster and the solve parameters
//! before any model is built. Detects:
//! - Empty teacher, room, session, or active-pair lists
//! - Duplicate IDs
//! - Active pairs referencing unknown rooms or sessions
//! - Backup ratio outside (0, 1]
//! - Non-positive time limits
//!
//! All problems are collected; nothing is silently corrected.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::Roster;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No teachers were supplied.
    EmptyTeachers,
    /// No rooms were supplied.
    EmptyRooms,
    /// No sessions were supplied.
    EmptySessions,
    /// No (room, session) pair requires supervision.
    EmptyActivePairs,
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// The same (room, session) pair is listed twice.
    DuplicateActivePair,
    /// An active pair references a room that doesn't exist.
    UnknownRoom,
    /// An active pair references a session that doesn't exist.
    UnknownSession,
    /// Backup ratio is not in (0, 1].
    InvalidBackupRatio,
    /// Time limit is below one second.
    InvalidTimeLimit,
    /// A derived count (quota, load bound) does not fit in 32 bits.
    CountOverflow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster.
///
/// Checks:
/// 1. Teachers, rooms, sessions, and active pairs are non-empty
/// 2. No duplicate teacher, room, or session IDs
/// 3. No duplicate active pairs
/// 4. Every active pair references a known room and session
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &Roster) -> ValidationResult {
    let mut errors = Vec::new();

    let checks = [
        (&roster.teachers, "teacher", ValidationErrorKind::EmptyTeachers),
        (&roster.rooms, "room", ValidationErrorKind::EmptyRooms),
        (&roster.sessions, "session", ValidationErrorKind::EmptySessions),
    ];
    for (ids, label, empty_kind) in checks {
        if ids.is_empty() {
            errors.push(ValidationError::new(empty_kind, format!("No {label}s supplied")));
        }
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate {label} ID: {id}"),
                ));
            }
        }
    }

    if roster.active_pairs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyActivePairs,
            "No room-session pair requires supervision",
        ));
    }

    let rooms: HashSet<&str> = roster.rooms.iter().map(String::as_str).collect();
    let sessions: HashSet<&str> = roster.sessions.iter().map(String::as_str).collect();
    let mut seen_pairs = HashSet::new();

    for pair in &roster.active_pairs {
        if !seen_pairs.insert(pair) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateActivePair,
                format!("Duplicate active pair: ({}, {})", pair.room, pair.session),
            ));
        }
        if !rooms.contains(pair.room.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownRoom,
                format!(
                    "Active pair ({}, {}) references unknown room '{}'",
                    pair.room, pair.session, pair.room
                ),
            ));
        }
        if !sessions.contains(pair.session.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownSession,
                format!(
                    "Active pair ({}, {}) references unknown session '{}'",
                    pair.room, pair.session, pair.session
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the backup ratio: must lie in (0, 1].
pub fn validate_backup_ratio(backup_ratio: f64) -> ValidationResult {
    if backup_ratio > 0.0 && backup_ratio <= 1.0 {
        Ok(())
    } else {
        Err(vec![ValidationError::new(
            ValidationErrorKind::InvalidBackupRatio,
            format!("Backup ratio must be in (0, 1], got {backup_ratio}"),
        )])
    }
}

/// Validates the time limit: must be at least one second.
pub fn validate_time_limit(time_limit_secs: u64) -> ValidationResult {
    if time_limit_secs >= 1 {
        Ok(())
    } else {
        Err(vec![ValidationError::new(
            ValidationErrorKind::InvalidTimeLimit,
            "Time limit must be at least 1 second",
        )])
    }
}

/// Validates a roster together with the solve parameters.
///
/// Errors from every check are merged into one list.
pub fn validate_input(roster: &Roster, backup_ratio: f64, time_limit_secs: u64) -> ValidationResult {
    let errors: Vec<ValidationError> = [
        validate_roster(roster),
        validate_backup_ratio(backup_ratio),
        validate_time_limit(time_limit_secs),
    ]
    .into_iter()
    .filter_map(Result::err)
    .flatten()
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Roster {
        Roster::new()
            .with_teachers(["A", "B", "C"])
            .with_rooms(["R1", "R2"])
            .with_sessions(["S1", "S2"])
            .with_active_pair("R1", "S1")
            .with_active_pair("R2", "S2")
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_roster(&sample_roster()).is_ok());
        assert!(validate_input(&sample_roster(), 0.2, 10).is_ok());
    }

    #[test]
    fn test_unknown_room() {
        let roster = sample_roster().with_active_pair("R9", "S1");
        let errors = validate_roster(&roster).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UnknownRoom));
        assert!(errors[0].message.contains("R9"));
    }

    #[test]
    fn test_unknown_session() {
        let roster = sample_roster().with_active_pair("R1", "S9");
        let errors = validate_roster(&roster).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::UnknownSession));
    }

    #[test]
    fn test_empty_lists() {
        let errors = validate_roster(&Roster::new()).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::EmptyTeachers));
        assert!(has_kind(&errors, ValidationErrorKind::EmptyRooms));
        assert!(has_kind(&errors, ValidationErrorKind::EmptySessions));
        assert!(has_kind(&errors, ValidationErrorKind::EmptyActivePairs));
    }

    #[test]
    fn test_duplicate_ids() {
        let roster = sample_roster()
            .with_teachers(["A", "A", "B"])
            .with_active_pair("R1", "S1");
        let errors = validate_roster(&roster).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("teacher")));
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateActivePair));
    }

    #[test]
    fn test_backup_ratio_range() {
        assert!(validate_backup_ratio(0.2).is_ok());
        assert!(validate_backup_ratio(1.0).is_ok());
        assert!(validate_backup_ratio(0.0).is_err());
        assert!(validate_backup_ratio(1.5).is_err());
        assert!(validate_backup_ratio(f64::NAN).is_err());
    }

    #[test]
    fn test_time_limit() {
        assert!(validate_time_limit(1).is_ok());
        let errors = validate_time_limit(0).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::InvalidTimeLimit));
    }

    #[test]
    fn test_multiple_errors() {
        let roster = sample_roster().with_active_pair("R9", "S9");
        let errors = validate_input(&roster, 0.0, 0).unwrap_err();
        assert!(errors.len() >= 4);
    }
}
