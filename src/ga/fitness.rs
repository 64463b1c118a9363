//! Fitness functions (higher is better).

use crate::checker::ConstraintChecker;
use crate::models::calendar::teaching_days;
use crate::models::{Roster, Schedule};
use crate::scheduler::TimetableKpi;

/// Penalty per audited violation in [`ConflictFitness`].
pub const VIOLATION_PENALTY: f64 = 100.0;

/// Penalty per empty teaching slot in [`ConflictFitness`].
pub const UNFILLED_PENALTY: f64 = 10.0;

/// Scores a schedule. Must be callable from several threads at once.
pub trait FitnessFunction: Send + Sync {
    /// Fitness of `schedule` (higher is better).
    fn evaluate(&self, schedule: &Schedule, roster: &Roster) -> f64;
}

/// Counts crowded days.
///
/// Each assignment on a day whose recorded count exceeds one costs one
/// point, so any schedule with more than one class a day scores
/// `-assignments`. Kept for comparison runs; it does not look at conflicts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderFitness;

impl FitnessFunction for PlaceholderFitness {
    fn evaluate(&self, schedule: &Schedule, _roster: &Roster) -> f64 {
        let mut score = 0.0;
        for timetable in schedule.timetables() {
            for day in teaching_days() {
                let count = timetable.day_count(day);
                if count > 1 {
                    score -= count as f64;
                }
            }
        }
        score
    }
}

/// Penalizes rule violations, empty slots and uneven load.
///
/// `-(100 * violations + 10 * unfilled + w * (faculty spread + day spread))`
#[derive(Debug, Clone, Copy)]
pub struct ConflictFitness {
    balance_weight: f64,
    checker: ConstraintChecker,
}

impl Default for ConflictFitness {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ConflictFitness {
    /// Creates the function with a load-balance weight.
    pub fn new(balance_weight: f64) -> Self {
        Self {
            balance_weight,
            checker: ConstraintChecker::new(),
        }
    }

    /// Audits with a different checker.
    pub fn with_checker(mut self, checker: ConstraintChecker) -> Self {
        self.checker = checker;
        self
    }
}

impl FitnessFunction for ConflictFitness {
    fn evaluate(&self, schedule: &Schedule, roster: &Roster) -> f64 {
        let violations = self.checker.audit(schedule, roster).len() as f64;
        let unfilled = schedule.unfilled_slots().len() as f64;
        let imbalance = TimetableKpi::calculate(schedule, roster).imbalance();

        -(VIOLATION_PENALTY * violations + UNFILLED_PENALTY * unfilled + self.balance_weight * imbalance)
    }
}
