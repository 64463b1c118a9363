//! Exact timetabling via SAT.
//!
//! Encodes the assignment problem as CNF over boolean decision variables
//! and solves it with `varisat`. One variable per
//! `(division, day, slot, faculty, subject)` means "this assignment is
//! selected".
//!
//! # Clauses
//!
//! - Exactly one candidate per `(division, day, slot)`: one at-least-one
//!   clause plus pairwise at-most-one clauses.
//! - Optionally, at most one selected candidate per `(day, slot, faculty)`
//!   across divisions (pairwise), so a faculty member never teaches two
//!   divisions at once.
//!
//! Feasibility only; there is no objective. Both the variable and the
//! clause count are checked against [`ExactConfig`] before encoding.
//!
//! # Reference
//! Biere et al. (2009), "Handbook of Satisfiability", Ch. 2 (CNF encodings)

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use tracing::{debug, info, warn};
use varisat::{solver::Solver, ExtendFormula, Lit, Var};

use crate::config::ExactConfig;
use crate::error::{Result, TimetableError};
use crate::models::calendar::{slots_per_week, teaching_slots};
use crate::models::{Assignment, Roster, Schedule, TimeSlot};

/// One decision variable: a faculty/subject pair at a division slot.
///
/// Faculty and subject are indices into the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Division number.
    pub division: u32,
    /// Grid coordinate.
    pub slot: TimeSlot,
    /// Index into `Roster::faculty`.
    pub faculty: usize,
    /// Index into that faculty member's subjects.
    pub subject: usize,
}

/// A CNF model. Variable `i` is `candidates[i]`.
#[derive(Debug, Clone, Default)]
pub struct SatModel {
    /// Decision variables in creation order.
    pub candidates: Vec<Candidate>,
    /// Conjunction of disjunctive clauses.
    pub clauses: Vec<Vec<Lit>>,
}

impl SatModel {
    /// Number of decision variables.
    pub fn variable_count(&self) -> usize {
        self.candidates.len()
    }

    /// Number of clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    fn add_exactly_one(&mut self, vars: &[Var]) {
        self.clauses.push(vars.iter().map(|v| v.positive()).collect());
        self.add_at_most_one(vars);
    }

    fn add_at_most_one(&mut self, vars: &[Var]) {
        for i in 0..vars.len() {
            for j in (i + 1)..vars.len() {
                self.clauses.push(vec![vars[i].negative(), vars[j].negative()]);
            }
        }
    }
}

/// Builds a SAT model from a roster.
///
/// # Example
/// ```
/// use u_timetable::cp::TimetableSatBuilder;
/// use u_timetable::models::{Faculty, Roster};
///
/// let roster = Roster::new()
///     .with_faculty(Faculty::new("A").with_subject("Math"))
///     .with_division_count(1);
/// let model = TimetableSatBuilder::new(&roster).build();
///
/// // 35 teaching slots x 1 faculty/subject pair
/// assert_eq!(model.variable_count(), 35);
/// ```
pub struct TimetableSatBuilder<'a> {
    roster: &'a Roster,
    faculty_exclusivity: bool,
}

impl<'a> TimetableSatBuilder<'a> {
    /// Creates a builder with faculty exclusivity enabled.
    pub fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            faculty_exclusivity: true,
        }
    }

    /// Enables or disables the cross-division faculty clauses.
    pub fn with_faculty_exclusivity(mut self, enabled: bool) -> Self {
        self.faculty_exclusivity = enabled;
        self
    }

    /// Number of variables [`build`](Self::build) would create.
    pub fn variable_count(&self) -> usize {
        self.roster.divisions.len() * slots_per_week() * self.roster.subject_pair_count()
    }

    /// Number of clauses [`build`](Self::build) would create.
    pub fn clause_count(&self) -> usize {
        let divisions = self.roster.divisions.len();
        let slots = slots_per_week();
        let pairs = self.roster.subject_pair_count();

        let per_slot = 1usize.saturating_add(pairs.saturating_mul(pairs.saturating_sub(1)) / 2);
        let mut total = divisions.saturating_mul(slots).saturating_mul(per_slot);

        if self.faculty_exclusivity {
            let cross_pairs = divisions.saturating_mul(divisions.saturating_sub(1)) / 2;
            for faculty in &self.roster.faculty {
                let n = faculty.subjects.len();
                let per_faculty = n
                    .saturating_mul(n)
                    .saturating_mul(cross_pairs)
                    .saturating_mul(slots);
                total = total.saturating_add(per_faculty);
            }
        }

        total
    }

    /// Builds the CNF model.
    pub fn build(&self) -> SatModel {
        let mut model = SatModel::default();
        // (slot, faculty) -> variables across divisions
        let mut by_faculty_slot: BTreeMap<(TimeSlot, usize), Vec<(u32, Var)>> = BTreeMap::new();

        for division in &self.roster.divisions {
            for slot in teaching_slots() {
                let mut slot_vars = Vec::with_capacity(self.roster.subject_pair_count());

                for (fi, faculty) in self.roster.faculty.iter().enumerate() {
                    for si in 0..faculty.subjects.len() {
                        let var = Var::from_index(model.candidates.len());
                        model.candidates.push(Candidate {
                            division: division.id,
                            slot,
                            faculty: fi,
                            subject: si,
                        });
                        slot_vars.push(var);
                        by_faculty_slot
                            .entry((slot, fi))
                            .or_default()
                            .push((division.id, var));
                    }
                }

                model.add_exactly_one(&slot_vars);
            }
        }

        if self.faculty_exclusivity {
            for vars in by_faculty_slot.values() {
                for i in 0..vars.len() {
                    for j in (i + 1)..vars.len() {
                        // same-division pairs are already covered by exactly-one
                        if vars[i].0 != vars[j].0 {
                            model
                                .clauses
                                .push(vec![vars[i].1.negative(), vars[j].1.negative()]);
                        }
                    }
                }
            }
        }

        model
    }

    /// Builds and solves the model within the configured budget.
    pub fn solve(&self, config: &ExactConfig) -> Result<Schedule> {
        let variables = self.variable_count();
        if variables > config.max_variables {
            warn!(variables, limit = config.max_variables, "SAT model over budget");
            return Err(TimetableError::BudgetExceeded {
                variables,
                limit: config.max_variables,
            });
        }
        let clauses = self.clause_count();
        if clauses > config.max_clauses {
            warn!(clauses, limit = config.max_clauses, "SAT model over clause budget");
            return Err(TimetableError::ClauseBudgetExceeded {
                clauses,
                limit: config.max_clauses,
            });
        }

        let started = Instant::now();
        let model = self.build();
        debug!(
            variables = model.variable_count(),
            clauses = model.clause_count(),
            exclusivity = self.faculty_exclusivity,
            "SAT model built"
        );

        let mut solver = Solver::new();
        for clause in &model.clauses {
            solver.add_clause(clause);
        }

        match solver.solve() {
            Ok(true) => {
                let lits = solver
                    .model()
                    .ok_or_else(|| TimetableError::Solver("SAT but no model returned".into()))?;
                let selected: HashSet<usize> = lits
                    .iter()
                    .filter(|l| l.is_positive())
                    .map(|l| l.var().index())
                    .collect();
                let schedule = self.decode(&model, &selected)?;
                info!(
                    assignments = schedule.assignment_count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "exact solver found a timetable"
                );
                Ok(schedule)
            }
            Ok(false) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "exact solver proved infeasibility"
                );
                Err(TimetableError::InfeasibleSchedule {
                    divisions: self.roster.divisions.len(),
                    slots: slots_per_week(),
                    pairs: self.roster.subject_pair_count(),
                })
            }
            Err(e) => Err(TimetableError::Solver(e.to_string())),
        }
    }

    /// Decodes the selected variables into a schedule.
    fn decode(&self, model: &SatModel, selected: &HashSet<usize>) -> Result<Schedule> {
        let mut schedule = Schedule::for_roster(self.roster);

        for (index, candidate) in model.candidates.iter().enumerate() {
            if !selected.contains(&index) {
                continue;
            }
            let faculty = &self.roster.faculty[candidate.faculty];
            let subject = &faculty.subjects[candidate.subject];
            let classroom = self
                .roster
                .division(candidate.division)
                .map(|d| d.classroom.as_str())
                .unwrap_or_default();

            schedule.place(Assignment::new(
                candidate.division,
                candidate.slot,
                &faculty.name,
                &subject.name,
                classroom,
            ))?;
        }

        Ok(schedule)
    }
}

/// Exact solving strategy.
///
/// Infeasibility is terminal: solving the same roster again gives the
/// same answer.
#[derive(Debug, Clone, Default)]
pub struct ExactSolver {
    config: ExactConfig,
}

impl ExactSolver {
    /// Creates a solver with the given settings.
    pub fn new(config: ExactConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &ExactConfig {
        &self.config
    }

    /// Validates the roster and solves it.
    pub fn solve(&self, roster: &Roster) -> Result<Schedule> {
        roster.validate()?;
        info!(
            faculty = roster.faculty.len(),
            divisions = roster.divisions.len(),
            exclusivity = self.config.enforce_faculty_exclusivity,
            "running exact solver"
        );
        TimetableSatBuilder::new(roster)
            .with_faculty_exclusivity(self.config.enforce_faculty_exclusivity)
            .solve(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::ConstraintChecker;
    use crate::models::calendar::teaching_days;
    use crate::models::{Faculty, ViolationType};

    fn single() -> Roster {
        Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_division_count(1)
    }

    fn pair() -> Roster {
        Roster::new()
            .with_faculty(Faculty::new("A").with_subject("Math"))
            .with_faculty(Faculty::new("B").with_subject("Physics"))
            .with_division_count(1)
    }

    #[test]
    fn test_build_model_sizes() {
        let roster = pair();
        let model = TimetableSatBuilder::new(&roster).build();
        assert_eq!(model.variable_count(), 70);
        // per slot: 1 at-least-one + 1 pairwise clause; no cross-division pairs
        assert_eq!(model.clause_count(), 35 * 2);
    }

    #[test]
    fn test_exclusivity_adds_clauses() {
        let roster = pair().with_division_count(2);
        let with = TimetableSatBuilder::new(&roster).build();
        let without = TimetableSatBuilder::new(&roster)
            .with_faculty_exclusivity(false)
            .build();
        assert_eq!(with.variable_count(), without.variable_count());
        // one extra clause per (slot, faculty)
        assert_eq!(with.clause_count() - without.clause_count(), 35 * 2);
    }

    #[test]
    fn test_single_faculty_fills_every_slot() {
        let roster = single();
        let schedule = ExactSolver::default().solve(&roster).unwrap();
        let t = schedule.timetable(1).unwrap();

        assert!(schedule.is_complete());
        assert_eq!(schedule.assignment_count(), 35);
        assert!(t.assignments().all(|a| a.faculty == "A" && a.subject == "Math"));
        assert!(t.day(0).is_empty());
        for day in teaching_days() {
            assert_eq!(t.day_count(day), t.day(day).len());
        }
        assert!(ConstraintChecker::new().is_valid(&schedule, &roster));
    }

    #[test]
    fn test_two_faculty_monday_coverage() {
        let roster = pair();
        let schedule = ExactSolver::default().solve(&roster).unwrap();
        let monday = schedule.timetable(1).unwrap().day(1);

        assert_eq!(monday.len(), 6);
        let mut indices: Vec<u8> = monday.iter().map(|a| a.slot.index()).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        for a in monday {
            assert!(
                (a.faculty == "A" && a.subject == "Math")
                    || (a.faculty == "B" && a.subject == "Physics")
            );
        }
    }

    #[test]
    fn test_exclusivity_makes_overbooked_roster_infeasible() {
        let roster = single().with_division_count(2);
        let err = ExactSolver::default().solve(&roster).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::InfeasibleSchedule {
                divisions: 2,
                slots: 35,
                pairs: 1
            }
        ));
    }

    #[test]
    fn test_without_exclusivity_faculty_may_overlap() {
        let roster = single().with_division_count(2);
        let solver = ExactSolver::new(ExactConfig {
            enforce_faculty_exclusivity: false,
            ..ExactConfig::default()
        });
        let schedule = solver.solve(&roster).unwrap();
        assert!(schedule.is_complete());

        let violations = ConstraintChecker::new().audit(&schedule, &roster);
        assert!(violations
            .iter()
            .all(|v| v.violation_type == ViolationType::FacultyOverlap));
        assert_eq!(violations.len(), 35);
    }

    #[test]
    fn test_two_divisions_two_faculty_is_valid() {
        let roster = pair().with_division_count(2);
        let schedule = ExactSolver::default().solve(&roster).unwrap();
        assert!(schedule.is_complete());
        assert!(ConstraintChecker::new().is_valid(&schedule, &roster));
    }

    #[test]
    fn test_budget_exceeded() {
        let roster = pair();
        let solver = ExactSolver::new(ExactConfig {
            max_variables: 10,
            ..ExactConfig::default()
        });
        assert!(matches!(
            solver.solve(&roster),
            Err(TimetableError::BudgetExceeded {
                variables: 70,
                limit: 10
            })
        ));
    }

    #[test]
    fn test_clause_count_matches_build() {
        let roster = Roster::new()
            .with_faculty(Faculty::new("A").with_subjects(["Math", "Stats"]))
            .with_faculty(Faculty::new("B").with_subject("Physics"))
            .with_faculty(Faculty::new("C").with_subject("Art"))
            .with_faculty(Faculty::new("Idle"))
            .with_division_count(3);

        for exclusivity in [true, false] {
            let builder = TimetableSatBuilder::new(&roster).with_faculty_exclusivity(exclusivity);
            let model = builder.build();
            assert_eq!(builder.clause_count(), model.clause_count(), "{exclusivity}");
            assert_eq!(builder.variable_count(), model.variable_count());
        }
        // 3 divisions x 35 slots x (1 + C(4, 2))
        assert_eq!(
            TimetableSatBuilder::new(&roster)
                .with_faculty_exclusivity(false)
                .clause_count(),
            3 * 35 * 7
        );
    }

    #[test]
    fn test_clause_budget_exceeded() {
        let roster = pair();
        let solver = ExactSolver::new(ExactConfig {
            max_clauses: 10,
            ..ExactConfig::default()
        });
        assert!(matches!(
            solver.solve(&roster),
            Err(TimetableError::ClauseBudgetExceeded {
                clauses: 70,
                limit: 10
            })
        ));
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::new().with_division_count(1);
        assert!(matches!(
            ExactSolver::default().solve(&roster),
            Err(TimetableError::EmptyRoster(_))
        ));
    }
}
