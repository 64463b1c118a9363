//! Strategy selection and solve reports.
//!
//! [`TimetableEngine`] validates the roster, seeds the random source,
//! runs the configured strategy and summarizes the result.
//!
//! # Example
//!
//! ```
//! use u_timetable::config::{EngineConfig, Strategy};
//! use u_timetable::engine::TimetableEngine;
//! use u_timetable::models::{Faculty, Roster};
//!
//! let roster = Roster::new()
//!     .with_faculty(Faculty::new("A").with_subject("Math"))
//!     .with_faculty(Faculty::new("B").with_subject("Physics"))
//!     .with_division_count(2);
//!
//! let config = EngineConfig::new()
//!     .with_strategy(Strategy::Exact)
//!     .with_random_seed(42);
//! let report = TimetableEngine::new(config).solve(&roster).unwrap();
//!
//! assert!(report.coverage.is_none());
//! assert!(report.violations.is_empty());
//! assert_eq!(report.kpi.filled, 70);
//! ```

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::checker::ConstraintChecker;
use crate::config::{EngineConfig, Strategy};
use crate::cp::ExactSolver;
use crate::error::Result;
use crate::ga::EvolutionarySolver;
use crate::models::{Roster, Schedule, Violation};
use crate::scheduler::{PartialCoverage, RotationScheduler, RoundRobinScheduler, TimetableKpi};

/// Result of one engine run.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Strategy that produced the schedule.
    pub strategy: Strategy,
    /// The schedule.
    pub schedule: Schedule,
    /// Empty slots, if any.
    pub coverage: Option<PartialCoverage>,
    /// Score under the configured fitness function.
    pub fitness: f64,
    /// Coverage and load metrics.
    pub kpi: TimetableKpi,
    /// Rules the schedule breaks.
    pub violations: Vec<Violation>,
    /// Wall time of the solve.
    pub elapsed: Duration,
}

impl SolveReport {
    /// Complete and free of violations.
    pub fn is_clean(&self) -> bool {
        self.coverage.is_none() && self.violations.is_empty()
    }
}

/// Timetable engine.
#[derive(Debug, Clone, Default)]
pub struct TimetableEngine {
    config: EngineConfig,
}

impl TimetableEngine {
    /// Creates an engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Solves with a random source seeded from the configuration
    /// (or from OS entropy when no seed is set).
    pub fn solve(&self, roster: &Roster) -> Result<SolveReport> {
        let seed = self.config.random_seed.unwrap_or_else(rand::random);
        info!(seed, "seeding random source");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.solve_with_rng(roster, &mut rng)
    }

    /// Solves with an injected random source.
    pub fn solve_with_rng<R: Rng + ?Sized>(&self, roster: &Roster, rng: &mut R) -> Result<SolveReport> {
        self.config.validate()?;
        roster.validate()?;

        let started = Instant::now();
        let strategy = self.config.strategy;
        let checker = ConstraintChecker::new()
            .with_cross_division_subject_check(self.config.round_robin.forbid_cross_division_subject);
        info!(
            ?strategy,
            faculty = roster.faculty.len(),
            divisions = roster.divisions.len(),
            "solve started"
        );

        let schedule = match strategy {
            Strategy::Exact => ExactSolver::new(self.config.exact.clone()).solve(roster)?,
            Strategy::RoundRobin => {
                RoundRobinScheduler::new()
                    .with_checker(checker)
                    .schedule(roster, rng)?
                    .schedule
            }
            Strategy::Rotation => {
                RotationScheduler::new()
                    .with_checker(checker)
                    .schedule(roster, rng)?
                    .schedule
            }
            Strategy::Evolutionary => {
                EvolutionarySolver::new(self.config.evolution.clone())
                    .with_checker(checker)
                    .solve(roster, rng)?
                    .best
            }
        };

        let coverage = PartialCoverage::from_schedule(&schedule);
        let fitness = self
            .config
            .evolution
            .fitness_function()
            .evaluate(&schedule, roster);
        let kpi = TimetableKpi::calculate(&schedule, roster);
        // the exact encoding has no cross-division subject rule
        let auditor = match strategy {
            Strategy::Exact => ConstraintChecker::new(),
            _ => checker,
        };
        let violations = auditor.audit(&schedule, roster);
        let elapsed = started.elapsed();

        if !violations.is_empty() {
            warn!(count = violations.len(), "schedule breaks hard constraints");
        }
        info!(
            ?strategy,
            fill_rate = kpi.fill_rate,
            fitness,
            elapsed_ms = elapsed.as_millis() as u64,
            "solve finished"
        );

        Ok(SolveReport {
            strategy,
            schedule,
            coverage,
            fitness,
            kpi,
            violations,
            elapsed,
        })
    }
}
