//! Evolutionary timetable refinement.
//!
//! Evolves a population of complete [`Schedule`](crate::models::Schedule)s
//! seeded by one of the heuristic schedulers.
//!
//! # Encoding
//!
//! A chromosome is the schedule itself: one timetable per division, each
//! holding day-indexed assignment lists. Genes are whole day lists.
//!
//! - **Crossover** exchanges a contiguous run of days between two parents,
//!   using the same cut points for every division.
//! - **Mutation** picks two assignments of one day and swaps them.
//!
//! # Submodules
//!
//! - [`operators`]: selection, crossover and mutation
//! - [`fitness`]: pluggable fitness functions
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning", Ch. 3 (tournament selection, two-point crossover)
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod fitness;
pub mod operators;
mod runner;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

pub use fitness::{ConflictFitness, FitnessFunction, PlaceholderFitness};
pub use operators::GeneticOperators;
pub use runner::{EvolutionarySolver, GaResult};

/// What a mutation does to the two chosen assignments of a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationMode {
    /// Swap list positions; each keeps its time slot.
    Reorder,
    /// Exchange time slots, then restore slot order.
    #[default]
    SlotExchange,
}

/// Fitness function selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessKind {
    /// See [`PlaceholderFitness`].
    Placeholder,
    /// See [`ConflictFitness`].
    #[default]
    Conflict,
}

/// Scheduler used to build the initial population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeding {
    /// [`RoundRobinScheduler`](crate::scheduler::RoundRobinScheduler).
    #[default]
    RoundRobin,
    /// [`RotationScheduler`](crate::scheduler::RotationScheduler).
    Rotation,
}

/// Evolutionary search parameters.
///
/// # Example
///
/// ```
/// use u_timetable::ga::{GaConfig, MutationMode};
///
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_mutation_mode(MutationMode::Reorder);
/// assert_eq!(config.generations, 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of schedules per generation.
    pub population_size: usize,
    /// Number of generations.
    pub generations: usize,
    /// Members drawn per tournament.
    pub tournament_size: usize,
    /// Per-division, per-day mutation probability.
    pub mutation_rate: f64,
    /// Mutation semantics.
    pub mutation_mode: MutationMode,
    /// Fitness function.
    pub fitness: FitnessKind,
    /// Weight of the load-balance term in [`ConflictFitness`].
    pub balance_weight: f64,
    /// Initial population scheduler.
    pub seeding: Seeding,
    /// Evaluate fitness on the rayon thread pool.
    pub parallel: bool,
    /// Wall-clock limit in seconds.
    pub time_limit_secs: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 100,
            tournament_size: 5,
            mutation_rate: 0.2,
            mutation_mode: MutationMode::default(),
            fitness: FitnessKind::default(),
            balance_weight: 1.0,
            seeding: Seeding::default(),
            parallel: true,
            time_limit_secs: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the mutation rate. Not clamped; see [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the mutation semantics.
    pub fn with_mutation_mode(mut self, mode: MutationMode) -> Self {
        self.mutation_mode = mode;
        self
    }

    /// Sets the fitness function.
    pub fn with_fitness(mut self, fitness: FitnessKind) -> Self {
        self.fitness = fitness;
        self
    }

    /// Sets the load-balance weight.
    pub fn with_balance_weight(mut self, weight: f64) -> Self {
        self.balance_weight = weight;
        self
    }

    /// Sets the seeding scheduler.
    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = Some(limit.as_secs());
        self
    }

    /// Wall-clock limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }

    /// Builds the configured fitness function.
    pub fn fitness_function(&self) -> Box<dyn FitnessFunction> {
        match self.fitness {
            FitnessKind::Placeholder => Box::new(PlaceholderFitness),
            FitnessKind::Conflict => Box::new(ConflictFitness::new(self.balance_weight)),
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "evolution.population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::Invalid(
                "evolution.tournament_size must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Invalid(format!(
                "evolution.mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !self.balance_weight.is_finite() || self.balance_weight < 0.0 {
            return Err(ConfigError::Invalid(
                "evolution.balance_weight must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
