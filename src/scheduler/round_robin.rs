//! Two-phase round-robin placement.
//!
//! # Algorithm
//!
//! 1. **Diagonal pass**: for each division and each faculty member in
//!    roster order, start at a random `(day, slot)` and make
//!    `MAX_DAYS - 1` attempts. A placed attempt advances both day (wrapping
//!    Saturday to Monday) and slot; a rejected one advances only the slot.
//! 2. **Gap filling**: for every slot still empty, try faculty in a random
//!    order until one attempt succeeds.
//!
//! Each attempt takes the faculty member's claim, draws one of their
//! subjects at random, asks the [`ConstraintChecker`] and commits.
//!
//! # Complexity
//! O(d * s * f) where d=divisions, s=teaching slots, f=faculty.

use std::cell::Cell;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::{debug, info, trace, warn};

use super::PlacementOutcome;
use crate::checker::ConstraintChecker;
use crate::error::Result;
use crate::models::calendar::{slots_on, teaching_slots, SLOT_LABELS};
use crate::models::{Assignment, Division, Roster, Schedule, TimeSlot, MAX_DAYS};

/// Per-faculty claim flags.
///
/// A claim is non-blocking: [`try_claim`](Self::try_claim) returns `None`
/// when the flag is already held, and the attempt fails.
#[derive(Debug, Default)]
pub struct ClaimTable {
    flags: Vec<Cell<bool>>,
}

impl ClaimTable {
    /// Creates a table with one free flag per faculty member.
    pub fn new(faculty_count: usize) -> Self {
        Self {
            flags: vec![Cell::new(false); faculty_count],
        }
    }

    /// Takes the claim of faculty `index`, released when the guard drops.
    pub fn try_claim(&self, index: usize) -> Option<ClaimGuard<'_>> {
        let flag = self.flags.get(index)?;
        if flag.replace(true) {
            return None;
        }
        Some(ClaimGuard { flag })
    }

    /// Whether faculty `index` is currently claimed.
    pub fn is_claimed(&self, index: usize) -> bool {
        self.flags.get(index).is_some_and(Cell::get)
    }
}

/// A held claim. Dropping it releases the claim.
#[derive(Debug)]
pub struct ClaimGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Greedy two-phase scheduler.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_timetable::models::{Faculty, Roster};
/// use u_timetable::scheduler::RoundRobinScheduler;
///
/// let roster = Roster::new()
///     .with_faculty(Faculty::new("A").with_subject("Math"))
///     .with_faculty(Faculty::new("B").with_subject("Physics"))
///     .with_division_count(2);
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();
/// assert!(outcome.is_complete());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RoundRobinScheduler {
    checker: ConstraintChecker,
}

impl Default for RoundRobinScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundRobinScheduler {
    /// Creates a scheduler using the strict checker.
    pub fn new() -> Self {
        Self {
            checker: ConstraintChecker::strict(),
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
            Some(coverage) => warn!(%coverage, "round-robin left slots empty"),
            None => info!(
                assignments = outcome.schedule.assignment_count(),
                "round-robin filled every slot"
            ),
        }
        Ok(outcome)
    }

    /// Builds a schedule from an already validated roster.
    pub(crate) fn build<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<PlacementOutcome> {
        let mut schedule = Schedule::for_roster(roster);
        let claims = ClaimTable::new(roster.faculty.len());

        let placed = self.diagonal_pass(&mut schedule, roster, &claims, rng)?;
        debug!(placed, "diagonal pass done");

        let filled = self.fill_gaps(&mut schedule, roster, &claims, rng);
        debug!(filled, "gap filling done");

        Ok(PlacementOutcome::new(schedule))
    }

    fn diagonal_pass<R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        roster: &Roster,
        claims: &ClaimTable,
        rng: &mut R,
    ) -> Result<usize> {
        let last_day = (MAX_DAYS - 1) as u8;
        let mut placed = 0;

        for division in &roster.divisions {
            for (fi, faculty) in roster.faculty.iter().enumerate() {
                if !faculty.has_subjects() {
                    continue;
                }

                let mut day: u8 = rng.random_range(1..=last_day);
                let mut slot: usize = rng.random_range(0..SLOT_LABELS.len());

                for _ in 0..MAX_DAYS - 1 {
                    let at = TimeSlot::new(day, (slot % slots_on(day)) as u8)?;
                    if self.attempt(schedule, roster, claims, division, fi, at, rng) {
                        placed += 1;
                        day = day % last_day + 1;
                    }
                    slot = (slot + 1) % SLOT_LABELS.len();
                }
            }
        }

        Ok(placed)
    }

    fn fill_gaps<R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        roster: &Roster,
        claims: &ClaimTable,
        rng: &mut R,
    ) -> usize {
        let mut order: Vec<usize> = (0..roster.faculty.len()).collect();
        let mut filled = 0;

        for division in &roster.divisions {
            for at in teaching_slots() {
                let free = schedule
                    .timetable(division.id)
                    .is_some_and(|t| t.is_free(at));
                if !free {
                    continue;
                }

                order.shuffle(rng);
                for &fi in &order {
                    if self.attempt(schedule, roster, claims, division, fi, at, rng) {
                        filled += 1;
                        break;
                    }
                }
            }
        }

        filled
    }

    #[allow(clippy::too_many_arguments)]
    fn attempt<R: Rng + ?Sized>(
        &self,
        schedule: &mut Schedule,
        roster: &Roster,
        claims: &ClaimTable,
        division: &Division,
        fi: usize,
        at: TimeSlot,
        rng: &mut R,
    ) -> bool {
        let Some(_claim) = claims.try_claim(fi) else {
            return false;
        };
        let faculty = &roster.faculty[fi];
        let Some(subject) = faculty.subjects.choose(rng) else {
            return false;
        };

        if !self.checker.can_place(schedule, division.id, at, faculty, subject) {
            trace!(division = division.id, %at, faculty = %faculty.name, "placement rejected");
            return false;
        }

        let assignment = Assignment::new(
            division.id,
            at,
            &faculty.name,
            &subject.name,
            &division.classroom,
        );
        schedule.place(assignment).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimetableError;
    use crate::models::Faculty;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn two_by_two() -> Roster {
        Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_faculty(Faculty::new("B").with_subject("Physics"))
            .with_division_count(2)
    }

    #[test]
    fn test_claims_are_exclusive_until_dropped() {
        let claims = ClaimTable::new(2);
        let first = claims.try_claim(0);
        assert!(first.is_some());
        assert!(claims.is_claimed(0));
        assert!(claims.try_claim(0).is_none());
        assert!(claims.try_claim(1).is_some());

        drop(first);
        assert!(!claims.is_claimed(0));
        assert!(claims.try_claim(0).is_some());
        assert!(claims.try_claim(5).is_none());
    }

    #[test]
    fn test_two_faculty_two_divisions() {
        let roster = two_by_two();
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();

        assert_eq!(outcome.coverage.is_none(), outcome.schedule.is_complete());
        assert!(outcome.is_complete());
        assert!(ConstraintChecker::strict().is_valid(&outcome.schedule, &roster));
    }

    #[test]
    fn test_fewer_faculty_than_divisions_warns() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_division_count(2);
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();

        let coverage = outcome.coverage.expect("one faculty cannot cover two divisions");
        assert_eq!(coverage.len(), 35);
        assert!(!outcome.schedule.is_complete());
        assert!(ConstraintChecker::new().is_valid(&outcome.schedule, &roster));
    }

    #[test]
    fn test_warning_matches_empty_slots() {
        // three divisions, two faculty: one division slot per time is always empty
        let roster = two_by_two().with_division_count(3);
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();
            let coverage = outcome.coverage.unwrap();
            assert_eq!(coverage.unfilled, outcome.schedule.unfilled_slots());
            assert_eq!(coverage.len(), 35);
        }
    }

    #[test]
    fn test_idle_faculty_never_placed() {
        let roster = two_by_two().with_faculty(Faculty::new("Idle"));
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();
        assert_eq!(outcome.schedule.assignments_for_faculty("Idle").count(), 0);
    }

    #[test]
    fn test_assignments_carry_division_classroom() {
        let roster = two_by_two().with_classrooms(["Lab", "Hall"]);
        let mut rng = SmallRng::seed_from_u64(42);
        let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();
        let t = outcome.schedule.timetable(2).unwrap();
        assert!(t.assignments().all(|a| a.classroom == "Hall" && a.division == 2));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let roster = Roster::new().with_division_count(2);
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(matches!(
            RoundRobinScheduler::new().schedule(&roster, &mut rng),
            Err(TimetableError::EmptyRoster(_))
        ));
    }
}
