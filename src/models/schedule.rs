//! Schedule (solution) model.
//!
//! A schedule holds one [`Timetable`] per division. A timetable keeps
//! seven day-indexed assignment lists (index 0 is the holiday and stays
//! empty) plus a per-day count that every mutating method keeps in sync.
//!
//! `Clone` is a deep copy: crossover and selection rely on cloned
//! schedules being independently owned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calendar::{slots_on, teaching_days, teaching_slots, TimeSlot, MAX_DAYS};
use super::Roster;
use crate::error::{Result, TimetableError};

/// One faculty member teaching one subject to one division at one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Division number.
    pub division: u32,
    /// Grid coordinate.
    pub slot: TimeSlot,
    /// Faculty name.
    pub faculty: String,
    /// Subject name.
    pub subject: String,
    /// Display name, see [`class_name`].
    pub class_name: String,
    /// Classroom of the division (denormalized for display).
    pub classroom: String,
}

/// Builds the display name of a class: `"{subject}_{faculty}_{division}"`.
pub fn class_name(subject: &str, faculty: &str, division: u32) -> String {
    format!("{subject}_{faculty}_{division}")
}

impl Assignment {
    /// Creates an assignment, deriving the class name.
    pub fn new(
        division: u32,
        slot: TimeSlot,
        faculty: impl Into<String>,
        subject: impl Into<String>,
        classroom: impl Into<String>,
    ) -> Self {
        let faculty = faculty.into();
        let subject = subject.into();
        Self {
            class_name: class_name(&subject, &faculty, division),
            division,
            slot,
            faculty,
            subject,
            classroom: classroom.into(),
        }
    }
}

/// One division's week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// Division number.
    pub division: u32,
    /// Classroom of the division.
    pub classroom: String,
    days: Vec<Vec<Assignment>>,
    counts: [usize; MAX_DAYS],
}

impl Timetable {
    /// Creates an empty week for a division.
    pub fn new(division: u32, classroom: impl Into<String>) -> Self {
        Self {
            division,
            classroom: classroom.into(),
            days: vec![Vec::new(); MAX_DAYS],
            counts: [0; MAX_DAYS],
        }
    }

    /// Assignments of a day in list order (empty for days outside the grid).
    pub fn day(&self, day: u8) -> &[Assignment] {
        self.days
            .get(day as usize)
            .map(|d| d.as_slice())
            .unwrap_or(&[])
    }

    /// Recorded number of assignments on a day.
    pub fn day_count(&self, day: u8) -> usize {
        self.counts.get(day as usize).copied().unwrap_or(0)
    }

    /// The assignment occupying a slot, if any.
    pub fn assignment_at(&self, slot: TimeSlot) -> Option<&Assignment> {
        self.day(slot.day()).iter().find(|a| a.slot == slot)
    }

    /// Whether a slot is unoccupied.
    #[inline]
    pub fn is_free(&self, slot: TimeSlot) -> bool {
        self.assignment_at(slot).is_none()
    }

    /// Appends an assignment to its day.
    ///
    /// Only the division is checked here; conflict rules live in
    /// [`ConstraintChecker`](crate::checker::ConstraintChecker).
    pub fn push(&mut self, assignment: Assignment) -> Result<()> {
        if assignment.division != self.division {
            return Err(TimetableError::UnknownDivision(assignment.division));
        }
        let day = assignment.slot.day() as usize;
        self.days[day].push(assignment);
        self.counts[day] += 1;
        Ok(())
    }

    /// Replaces a whole day list, resetting its count.
    pub fn replace_day(&mut self, day: u8, assignments: Vec<Assignment>) {
        let day = day as usize;
        if day >= MAX_DAYS {
            return;
        }
        self.counts[day] = assignments.len();
        self.days[day] = assignments;
    }

    /// Swaps two list positions of a day. Slots are untouched.
    pub fn swap_positions(&mut self, day: u8, i: usize, j: usize) {
        if let Some(list) = self.days.get_mut(day as usize) {
            if i < list.len() && j < list.len() {
                list.swap(i, j);
            }
        }
    }

    /// Exchanges the time slots of two assignments of a day, then restores
    /// slot order within the day.
    pub fn exchange_slots(&mut self, day: u8, i: usize, j: usize) {
        if let Some(list) = self.days.get_mut(day as usize) {
            if i < list.len() && j < list.len() && i != j {
                let slot_i = list[i].slot;
                list[i].slot = list[j].slot;
                list[j].slot = slot_i;
                list.sort_by_key(|a| a.slot);
            }
        }
    }

    /// All assignments, day-major, in list order.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.days.iter().flatten()
    }

    /// Number of assignments in the week.
    pub fn assignment_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    /// Teaching slots without an assignment.
    pub fn unfilled_slots(&self) -> Vec<TimeSlot> {
        teaching_slots().filter(|s| self.is_free(*s)).collect()
    }

    /// Whether every teaching slot holds an assignment.
    pub fn is_complete(&self) -> bool {
        teaching_days().all(|day| {
            (0..slots_on(day) as u8).all(|index| {
                self.day(day).iter().any(|a| a.slot.index() == index)
            })
        })
    }
}

/// A complete schedule: one timetable per division.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    timetables: BTreeMap<u32, Timetable>,
}

impl Schedule {
    /// Creates a schedule with no divisions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty timetable for every division of a roster.
    pub fn for_roster(roster: &Roster) -> Self {
        let mut schedule = Self::new();
        for division in &roster.divisions {
            schedule.add_timetable(Timetable::new(division.id, &division.classroom));
        }
        schedule
    }

    /// Adds (or replaces) a division's timetable.
    pub fn add_timetable(&mut self, timetable: Timetable) {
        self.timetables.insert(timetable.division, timetable);
    }

    /// A division's timetable.
    pub fn timetable(&self, division: u32) -> Option<&Timetable> {
        self.timetables.get(&division)
    }

    /// A division's timetable, mutably.
    pub fn timetable_mut(&mut self, division: u32) -> Option<&mut Timetable> {
        self.timetables.get_mut(&division)
    }

    /// Timetables in division order.
    pub fn timetables(&self) -> impl Iterator<Item = &Timetable> {
        self.timetables.values()
    }

    /// Timetables in division order, mutably.
    pub fn timetables_mut(&mut self) -> impl Iterator<Item = &mut Timetable> {
        self.timetables.values_mut()
    }

    /// Division ids in ascending order.
    pub fn division_ids(&self) -> Vec<u32> {
        self.timetables.keys().copied().collect()
    }

    /// Commits an assignment to its division's timetable.
    pub fn place(&mut self, assignment: Assignment) -> Result<()> {
        self.timetables
            .get_mut(&assignment.division)
            .ok_or(TimetableError::UnknownDivision(assignment.division))?
            .push(assignment)
    }

    /// All assignments, division-major.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.timetables.values().flat_map(Timetable::assignments)
    }

    /// Assignments at a slot across all divisions.
    pub fn assignments_at(&self, slot: TimeSlot) -> impl Iterator<Item = &Assignment> {
        self.timetables
            .values()
            .flat_map(move |t| t.day(slot.day()).iter().filter(move |a| a.slot == slot))
    }

    /// Assignments taught by a faculty member.
    pub fn assignments_for_faculty<'a>(
        &'a self,
        faculty: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments().filter(move |a| a.faculty == faculty)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.timetables.values().map(Timetable::assignment_count).sum()
    }

    /// Every empty (division, slot) pair.
    pub fn unfilled_slots(&self) -> Vec<(u32, TimeSlot)> {
        self.timetables
            .values()
            .flat_map(|t| t.unfilled_slots().into_iter().map(move |s| (t.division, s)))
            .collect()
    }

    /// Whether every division's week is fully covered.
    pub fn is_complete(&self) -> bool {
        self.timetables.values().all(Timetable::is_complete)
    }
}

/// A rule broken by a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Division the offending assignment belongs to.
    pub division: u32,
    /// Grid coordinate, when the violation is tied to one.
    pub slot: Option<TimeSlot>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// A faculty member teaches two divisions at the same slot.
    FacultyOverlap,
    /// Two assignments share one division slot.
    SlotConflict,
    /// Assignment on the holiday or past the end of a day.
    DayOutOfRange,
    /// Subject not in the faculty member's subject list.
    SubjectNotOwned,
    /// Faculty member not in the roster.
    UnknownFaculty,
    /// Division not in the roster.
    UnknownDivision,
    /// Same subject at the same slot in two divisions.
    SubjectDuplicated,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        division: u32,
        slot: Option<TimeSlot>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            division,
            slot,
            message: message.into(),
            severity,
        }
    }

    /// Creates a faculty overlap violation.
    pub fn faculty_overlap(division: u32, slot: TimeSlot, message: impl Into<String>) -> Self {
        Self::new(ViolationType::FacultyOverlap, division, Some(slot), message, 95)
    }

    /// Creates a slot conflict violation.
    pub fn slot_conflict(division: u32, slot: TimeSlot, message: impl Into<String>) -> Self {
        Self::new(ViolationType::SlotConflict, division, Some(slot), message, 95)
    }

    /// Creates a day-bounds violation.
    pub fn day_out_of_range(division: u32, slot: TimeSlot, message: impl Into<String>) -> Self {
        Self::new(ViolationType::DayOutOfRange, division, Some(slot), message, 100)
    }

    /// Creates a subject ownership violation.
    pub fn subject_not_owned(division: u32, slot: TimeSlot, message: impl Into<String>) -> Self {
        Self::new(ViolationType::SubjectNotOwned, division, Some(slot), message, 90)
    }

    /// Creates an unknown faculty violation.
    pub fn unknown_faculty(division: u32, slot: TimeSlot, message: impl Into<String>) -> Self {
        Self::new(ViolationType::UnknownFaculty, division, Some(slot), message, 90)
    }

    /// Creates an unknown division violation.
    pub fn unknown_division(division: u32, message: impl Into<String>) -> Self {
        Self::new(ViolationType::UnknownDivision, division, None, message, 80)
    }

    /// Creates a duplicated subject violation.
    pub fn subject_duplicated(division: u32, slot: TimeSlot, message: impl Into<String>) -> Self {
        Self::new(ViolationType::SubjectDuplicated, division, Some(slot), message, 40)
    }
}
