//! Cyclic faculty rotation.
//!
//! Walks the week day-major and hands each `(day, slot, division)` cell to
//! faculty member
//!
//! ```text
//! (day * slots_on(day) * divisions + slot * divisions + position) mod n
//! ```
//!
//! where `position` is the division's zero-based place in the roster.
//! The subject is drawn at random from that faculty member's list. Cells
//! the checker rejects stay empty.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, trace, warn};

use super::PlacementOutcome;
use crate::checker::ConstraintChecker;
use crate::error::Result;
use crate::models::calendar::{slots_on, teaching_slots};
use crate::models::{Assignment, Roster, Schedule};

/// Deterministic rotation scheduler.
#[derive(Debug, Clone, Copy)]
pub struct RotationScheduler {
    checker: ConstraintChecker,
}

impl Default for RotationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationScheduler {
    /// Creates a scheduler using the default checker.
    pub fn new() -> Self {
        Self {
            checker: ConstraintChecker::new(),
        }
    }

    /// Replaces the placement checker.
    pub fn with_checker(mut self, checker: ConstraintChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Validates the roster and builds a schedule.
    pub fn schedule<R: Rng + ?Sized>(&self, roster: &Roster, rng: &mut R) -> Result<PlacementOutcome> {
        roster.validate()?;
        let outcome = self.build(roster, rng)?;
        match &outcome.coverage {
            Some(coverage) => warn!(%coverage, "rotation left slots empty"),
            None => info!(
                assignments = outcome.schedule.assignment_count(),
                "rotation filled every slot"
            ),
        }
        Ok(outcome)
    }

    pub(crate) fn build<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<PlacementOutcome> {
        let mut schedule = Schedule::for_roster(roster);
        let n = roster.faculty.len();
        let divisions = roster.divisions.len();

        if n > 0 {
            for at in teaching_slots() {
                let day = at.day() as usize;
                let slot = at.index() as usize;

                for (position, division) in roster.divisions.iter().enumerate() {
                    let fi = (day * slots_on(at.day()) * divisions + slot * divisions + position) % n;
                    let faculty = &roster.faculty[fi];
                    let Some(subject) = faculty.subjects.choose(rng) else {
                        continue;
                    };

                    if !self.checker.can_place(&schedule, division.id, at, faculty, subject) {
                        trace!(division = division.id, %at, faculty = %faculty.name, "rotation skipped");
                        continue;
                    }

                    schedule.place(Assignment::new(
                        division.id,
                        at,
                        &faculty.name,
                        &subject.name,
                        &division.classroom,
                    ))?;
                }
            }
        }

        Ok(PlacementOutcome::new(schedule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Faculty, TimeSlot};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_two_faculty_alternate_by_division() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_faculty(Faculty::new("B").with_subject("Physics"))
            .with_division_count(2);
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RotationScheduler::new().schedule(&roster, &mut rng).unwrap();

        assert!(outcome.is_complete());
        let s = &outcome.schedule;
        assert!(s.timetable(1).unwrap().assignments().all(|a| a.faculty == "A"));
        assert!(s.timetable(2).unwrap().assignments().all(|a| a.faculty == "B"));
        assert!(ConstraintChecker::new().is_valid(s, &roster));
    }

    #[test]
    fn test_rotation_is_deterministic_per_faculty() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subjects(["Math", "Stats"]))
            .with_faculty(Faculty::new("B").with_subject("Physics"))
            .with_faculty(Faculty::new("C").with_subject("Art"))
            .with_division_count(1);

        let mut rng1 = SmallRng::seed_from_u64(1);
        let mut rng2 = SmallRng::seed_from_u64(2);
        let s1 = RotationScheduler::new().schedule(&roster, &mut rng1).unwrap().schedule;
        let s2 = RotationScheduler::new().schedule(&roster, &mut rng2).unwrap().schedule;

        let faculty = |s: &Schedule| -> Vec<String> {
            s.assignments().map(|a| a.faculty.clone()).collect()
        };
        assert_eq!(faculty(&s1), faculty(&s2));

        // Monday: (1*6*1 + 0) % 3 = 0
        let monday_first = TimeSlot::new(1, 0).unwrap();
        assert_eq!(
            s1.timetable(1).unwrap().assignment_at(monday_first).unwrap().faculty,
            "A"
        );
        // Saturday: (6*5*1 + 1) % 3 = 1
        let saturday_second = TimeSlot::new(6, 1).unwrap();
        assert_eq!(
            s1.timetable(1).unwrap().assignment_at(saturday_second).unwrap().faculty,
            "B"
        );
    }

    #[test]
    fn test_rejected_cells_reported() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_division_count(2);
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RotationScheduler::new().schedule(&roster, &mut rng).unwrap();

        let coverage = outcome.coverage.unwrap();
        assert_eq!(coverage.divisions(), vec![2]);
        assert_eq!(coverage.len(), 35);
    }

    #[test]
    fn test_idle_faculty_cells_stay_empty() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_faculty(Faculty::new("Idle"))
            .with_division_count(1);
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RotationScheduler::new().schedule(&roster, &mut rng).unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.schedule.assignments_for_faculty("Idle").count(), 0);
    }
}
