//! Roster (problem input) model.
//!
//! A roster is everything the engine needs from the outside world:
//! faculty with their subjects, the divisions with their classrooms,
//! and an optional scheduling granularity. It is read-only once built.

use serde::{Deserialize, Serialize};

use super::{Division, Faculty};
use crate::error::{Result, TimetableError};
use crate::validation::{validate_roster, ValidationErrorKind};

/// Input to every solver.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Faculty, Roster};
///
/// let roster = Roster::new()
///     .with_faculty(Faculty::new("A").with_subject("Math"))
///     .with_faculty(Faculty::new("B").with_subject("Physics"))
///     .with_division_count(2);
///
/// assert_eq!(roster.divisions.len(), 2);
/// assert_eq!(roster.divisions[1].classroom, "Classroom_2");
/// assert!(roster.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Faculty in roster order.
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    /// Divisions, ids `1..=n`.
    #[serde(default)]
    pub divisions: Vec<Division>,
    /// Scheduling granularity. Accepted for compatibility; no solver uses it.
    #[serde(default)]
    pub time_quantum: Option<u32>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: Faculty) -> Self {
        self.faculty.push(faculty);
        self
    }

    /// Adds a division.
    pub fn with_division(mut self, division: Division) -> Self {
        self.divisions.push(division);
        self
    }

    /// Replaces the divisions with `1..=count`, using default classrooms.
    pub fn with_division_count(mut self, count: u32) -> Self {
        self.divisions = (1..=count).map(Division::with_default_classroom).collect();
        self
    }

    /// Replaces the divisions with one per classroom label, numbered from 1.
    pub fn with_classrooms<I, S>(mut self, classrooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.divisions = classrooms
            .into_iter()
            .enumerate()
            .map(|(i, room)| Division::new(i as u32 + 1, room))
            .collect();
        self
    }

    /// Sets the scheduling granularity.
    pub fn with_time_quantum(mut self, quantum: u32) -> Self {
        self.time_quantum = Some(quantum);
        self
    }

    /// Looks up a faculty member by name.
    pub fn faculty_by_name(&self, name: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.name == name)
    }

    /// Looks up a division by id.
    pub fn division(&self, id: u32) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    /// Division ids in roster order.
    pub fn division_ids(&self) -> Vec<u32> {
        self.divisions.iter().map(|d| d.id).collect()
    }

    /// Total number of (faculty, subject) pairs.
    pub fn subject_pair_count(&self) -> usize {
        self.faculty.iter().map(|f| f.subjects.len()).sum()
    }

    /// Validates the roster, folding all problems into one error.
    ///
    /// Returns `EmptyRoster` when the roster has no faculty or no subjects,
    /// `InvalidRoster` for any other structural problem.
    pub fn validate(&self) -> Result<()> {
        let errors = match validate_roster(self) {
            Ok(()) => return Ok(()),
            Err(errors) => errors,
        };

        if let Some(empty) = errors
            .iter()
            .find(|e| e.kind == ValidationErrorKind::EmptyRoster)
        {
            return Err(TimetableError::EmptyRoster(empty.message.clone()));
        }
        Err(TimetableError::InvalidRoster(errors))
    }
}
