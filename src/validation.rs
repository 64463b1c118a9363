//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a roster before any solver runs.
//! Detects:
//! - Empty rosters (no faculty, or no subjects at all)
//! - Duplicate faculty, subject, and division identifiers
//! - Subjects listed under a faculty member that does not own them
//! - Division counts outside `1..=MAX_DIVISIONS` and gaps in numbering
//! - Names that are empty, too long, or use characters reserved by the
//!   text grid

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::models::{Roster, MAX_DIVISIONS};

/// Maximum faculty name length.
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum subject name length.
pub const MAX_SUBJECT_LENGTH: usize = 50;

const RESERVED_CHARS: [char; 5] = ['|', '(', ')', '\n', '\r'];

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No faculty, or no subject in the whole roster.
    EmptyRoster,
    /// Two faculty members share a name.
    DuplicateFaculty,
    /// A faculty member lists the same subject twice.
    DuplicateSubject,
    /// Two divisions share an id.
    DuplicateDivision,
    /// A subject's owner differs from the faculty member listing it.
    SubjectOwnerMismatch,
    /// Division count or numbering out of range.
    DivisionCountOutOfRange,
    /// Empty, overlong, or reserved-character name.
    InvalidName,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a roster.
///
/// Checks:
/// 1. At least one faculty member and at least one subject overall
/// 2. No duplicate faculty names
/// 3. No duplicate subject names within one faculty member
/// 4. Every subject is owned by the faculty member listing it
/// 5. Division count in `1..=MAX_DIVISIONS`, ids exactly `1..=count`
/// 6. Names non-empty, within length limits, free of reserved characters
///
/// A faculty member without subjects is allowed (they are never placed)
/// as long as the roster has subjects elsewhere.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &Roster) -> ValidationResult {
    let mut errors = Vec::new();

    if roster.faculty.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoster,
            "No faculty supplied",
        ));
    } else if roster.subject_pair_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoster,
            "No subjects supplied for any faculty",
        ));
    }

    let mut faculty_names = HashSet::new();
    for faculty in &roster.faculty {
        if !faculty_names.insert(faculty.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateFaculty,
                format!("Duplicate faculty: {}", faculty.name),
            ));
        }
        check_name(&mut errors, "Faculty", &faculty.name, MAX_NAME_LENGTH);

        if !faculty.has_subjects() {
            warn!(faculty = %faculty.name, "faculty has no subjects and will not be scheduled");
        }

        let mut subject_names = HashSet::new();
        for subject in &faculty.subjects {
            if !subject_names.insert(subject.name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateSubject,
                    format!(
                        "Faculty '{}' lists subject '{}' twice",
                        faculty.name, subject.name
                    ),
                ));
            }
            if subject.faculty != faculty.name {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SubjectOwnerMismatch,
                    format!(
                        "Subject '{}' is owned by '{}' but listed under '{}'",
                        subject.name, subject.faculty, faculty.name
                    ),
                ));
            }
            check_name(&mut errors, "Subject", &subject.name, MAX_SUBJECT_LENGTH);
        }
    }

    check_divisions(&mut errors, roster);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_divisions(errors: &mut Vec<ValidationError>, roster: &Roster) {
    let count = roster.divisions.len();
    if count == 0 || count > MAX_DIVISIONS {
        errors.push(ValidationError::new(
            ValidationErrorKind::DivisionCountOutOfRange,
            format!("Division count {count} outside 1..={MAX_DIVISIONS}"),
        ));
    }

    let mut ids = HashSet::new();
    for division in &roster.divisions {
        if !ids.insert(division.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDivision,
                format!("Duplicate division: {}", division.id),
            ));
        } else if division.id == 0 || division.id as usize > count {
            errors.push(ValidationError::new(
                ValidationErrorKind::DivisionCountOutOfRange,
                format!("Division id {} outside 1..={count}", division.id),
            ));
        }
        check_name(errors, "Classroom", &division.classroom, MAX_NAME_LENGTH);
    }
}

fn check_name(errors: &mut Vec<ValidationError>, what: &str, name: &str, max_len: usize) {
    if name.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidName,
            format!("{what} name is empty"),
        ));
    } else if name.chars().count() > max_len {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidName,
            format!("{what} name '{name}' longer than {max_len} characters"),
        ));
    } else if name != name.trim() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidName,
            format!("{what} name '{name}' has leading or trailing whitespace"),
        ));
    } else if name.contains(RESERVED_CHARS) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidName,
            format!("{what} name '{}' contains a reserved character", name.escape_default()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Division, Faculty, Subject};

    fn sample_roster() -> Roster {
        Roster::new()
            .with_faculty(Faculty::new("A").with_subjects(["Math", "Stats"]))
            .with_faculty(Faculty::new("B").with_subject("Physics"))
            .with_division_count(2)
    }

    fn has_kind(roster: &Roster, kind: ValidationErrorKind) -> bool {
        validate_roster(roster)
            .unwrap_err()
            .iter()
            .any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_roster() {
        assert!(validate_roster(&sample_roster()).is_ok());
    }

    #[test]
    fn test_empty_faculty_list() {
        let roster = Roster::new().with_division_count(1);
        assert!(has_kind(&roster, ValidationErrorKind::EmptyRoster));
    }

    #[test]
    fn test_no_subjects_anywhere() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A"))
            .with_faculty(Faculty::new("B"))
            .with_division_count(1);
        assert!(has_kind(&roster, ValidationErrorKind::EmptyRoster));
    }

    #[test]
    fn test_idle_faculty_is_tolerated() {
        let roster = sample_roster().with_faculty(Faculty::new("Idle"));
        assert!(validate_roster(&roster).is_ok());
    }

    #[test]
    fn test_duplicate_faculty() {
        let roster = sample_roster().with_faculty(Faculty::new("A").with_subject("Art"));
        assert!(has_kind(&roster, ValidationErrorKind::DuplicateFaculty));
    }

    #[test]
    fn test_duplicate_subject() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subjects(["Math", "Math"]))
            .with_division_count(1);
        assert!(has_kind(&roster, ValidationErrorKind::DuplicateSubject));
    }

    #[test]
    fn test_subject_owner_mismatch() {
        let mut faculty = Faculty::new("A");
        faculty.subjects.push(Subject::new("Math", "B"));
        let roster = Roster::new().with_faculty(faculty).with_division_count(1);
        assert!(has_kind(&roster, ValidationErrorKind::SubjectOwnerMismatch));
    }

    #[test]
    fn test_division_count_bounds() {
        assert!(has_kind(
            &sample_roster().with_division_count(0),
            ValidationErrorKind::DivisionCountOutOfRange
        ));
        assert!(has_kind(
            &sample_roster().with_division_count(6),
            ValidationErrorKind::DivisionCountOutOfRange
        ));
        assert!(validate_roster(&sample_roster().with_division_count(5)).is_ok());
    }

    #[test]
    fn test_division_numbering() {
        let gap = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_division(Division::new(1, "R1"))
            .with_division(Division::new(3, "R3"));
        assert!(has_kind(&gap, ValidationErrorKind::DivisionCountOutOfRange));

        let dup = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_division(Division::new(1, "R1"))
            .with_division(Division::new(1, "R1b"));
        assert!(has_kind(&dup, ValidationErrorKind::DuplicateDivision));
    }

    #[test]
    fn test_invalid_names() {
        let reserved = Roster::new()
            .with_faculty(Faculty::new("A|B").with_subject("Math"))
            .with_division_count(1);
        assert!(has_kind(&reserved, ValidationErrorKind::InvalidName));

        let long = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("x".repeat(51)))
            .with_division_count(1);
        assert!(has_kind(&long, ValidationErrorKind::InvalidName));

        let empty_room = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_classrooms([" "]);
        assert!(has_kind(&empty_room, ValidationErrorKind::InvalidName));
    }

    #[test]
    fn test_padded_names_rejected() {
        // grid cells are trimmed on parse, so padding would not survive a round trip
        for subject in [" Math", "Math ", "\tMath"] {
            let roster = Roster::new()
                .with_faculty(Faculty::new("A").with_subject(subject))
                .with_division_count(1);
            assert!(has_kind(&roster, ValidationErrorKind::InvalidName), "{subject:?}");
        }

        let padded_faculty = Roster::new()
            .with_faculty(Faculty::new("A ").with_subject("Math"))
            .with_division_count(1);
        assert!(has_kind(&padded_faculty, ValidationErrorKind::InvalidName));

        let inner_space = Roster::new()
            .with_faculty(Faculty::new("Dr Rao").with_subject("Linear Algebra"))
            .with_division_count(1);
        assert!(validate_roster(&inner_space).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subjects(["Math", "Math"]))
            .with_faculty(Faculty::new("A").with_subject("Art"))
            .with_division_count(0);
        let errors = validate_roster(&roster).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
