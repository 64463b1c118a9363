//! Hard-constraint checks shared by every solver.
//!
//! [`ConstraintChecker::can_place`] is the placement predicate used by the
//! heuristic schedulers before committing an assignment.
//! [`ConstraintChecker::audit`] lists every rule a finished schedule
//! breaks; the fitness functions and the engine report build on it.
//!
//! # Rules
//!
//! 1. A faculty member teaches at most one division per slot.
//! 2. A division slot holds at most one assignment.
//! 3. Nothing on the holiday; nothing past a day's last slot.
//! 4. The subject belongs to the faculty member teaching it.
//!
//! In strict mode the same subject may also not run at the same slot in
//! two divisions.

use std::collections::HashMap;

use crate::models::{Faculty, Roster, Schedule, Subject, TimeSlot, Violation, MAX_DAYS};

/// Placement predicate and schedule auditor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintChecker {
    forbid_cross_division_subject: bool,
}

impl ConstraintChecker {
    /// Creates a checker enforcing rules 1-4.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker that also rejects a subject running in two
    /// divisions at the same slot.
    pub fn strict() -> Self {
        Self {
            forbid_cross_division_subject: true,
        }
    }

    /// Enables or disables the cross-division subject rule.
    pub fn with_cross_division_subject_check(mut self, enabled: bool) -> Self {
        self.forbid_cross_division_subject = enabled;
        self
    }

    /// Whether the cross-division subject rule is enabled.
    pub fn is_strict(&self) -> bool {
        self.forbid_cross_division_subject
    }

    /// Whether `faculty` teaching `subject` to `division` at `slot` keeps
    /// the schedule valid.
    pub fn can_place(
        &self,
        schedule: &Schedule,
        division: u32,
        slot: TimeSlot,
        faculty: &Faculty,
        subject: &Subject,
    ) -> bool {
        let Some(timetable) = schedule.timetable(division) else {
            return false;
        };

        if subject.faculty != faculty.name || !faculty.teaches(&subject.name) {
            return false;
        }

        if !timetable.is_free(slot) {
            return false;
        }

        for other in schedule.assignments_at(slot) {
            if other.faculty == faculty.name {
                return false;
            }
            if self.forbid_cross_division_subject
                && other.division != division
                && other.subject == subject.name
            {
                return false;
            }
        }

        true
    }

    /// Lists every rule the schedule breaks against the roster.
    pub fn audit(&self, schedule: &Schedule, roster: &Roster) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut faculty_at: HashMap<(TimeSlot, &str), u32> = HashMap::new();
        let mut subject_at: HashMap<(TimeSlot, &str), u32> = HashMap::new();

        for timetable in schedule.timetables() {
            let division = timetable.division;
            if roster.division(division).is_none() {
                violations.push(Violation::unknown_division(
                    division,
                    format!("Division {division} is not in the roster"),
                ));
            }

            for day in 0..MAX_DAYS as u8 {
                let mut occupied: HashMap<TimeSlot, &str> = HashMap::new();

                for a in timetable.day(day) {
                    if a.slot.day() != day {
                        violations.push(Violation::day_out_of_range(
                            division,
                            a.slot,
                            format!(
                                "'{}' recorded on day {day} but scheduled for {}",
                                a.class_name, a.slot
                            ),
                        ));
                    }

                    if let Some(first) = occupied.insert(a.slot, &a.class_name) {
                        violations.push(Violation::slot_conflict(
                            division,
                            a.slot,
                            format!("'{}' and '{}' share {}", first, a.class_name, a.slot),
                        ));
                    }

                    match roster.faculty_by_name(&a.faculty) {
                        None => violations.push(Violation::unknown_faculty(
                            division,
                            a.slot,
                            format!("Faculty '{}' is not in the roster", a.faculty),
                        )),
                        Some(f) if !f.teaches(&a.subject) => {
                            violations.push(Violation::subject_not_owned(
                                division,
                                a.slot,
                                format!("'{}' does not teach '{}'", a.faculty, a.subject),
                            ))
                        }
                        Some(_) => {}
                    }

                    if let Some(&other) = faculty_at.get(&(a.slot, a.faculty.as_str())) {
                        if other != division {
                            violations.push(Violation::faculty_overlap(
                                division,
                                a.slot,
                                format!(
                                    "'{}' teaches divisions {other} and {division} at {}",
                                    a.faculty, a.slot
                                ),
                            ));
                        }
                    } else {
                        faculty_at.insert((a.slot, a.faculty.as_str()), division);
                    }

                    if self.forbid_cross_division_subject {
                        if let Some(&other) = subject_at.get(&(a.slot, a.subject.as_str())) {
                            if other != division {
                                violations.push(Violation::subject_duplicated(
                                    division,
                                    a.slot,
                                    format!(
                                        "'{}' runs in divisions {other} and {division} at {}",
                                        a.subject, a.slot
                                    ),
                                ));
                            }
                        } else {
                            subject_at.insert((a.slot, a.subject.as_str()), division);
                        }
                    }
                }
            }
        }

        violations
    }

    /// Whether the schedule breaks no rule.
    pub fn is_valid(&self, schedule: &Schedule, roster: &Roster) -> bool {
        self.audit(schedule, roster).is_empty()
    }
}
