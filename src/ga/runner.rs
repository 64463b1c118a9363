//! Generational loop.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::operators::{tournament_select, GeneticOperators};
use super::{FitnessFunction, GaConfig, Seeding};
use crate::checker::ConstraintChecker;
use crate::error::Result;
use crate::models::{Roster, Schedule};
use crate::scheduler::{RotationScheduler, RoundRobinScheduler};

/// Outcome of an evolutionary run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Fittest member of the final population.
    pub best: Schedule,
    /// Its fitness.
    pub best_fitness: f64,
    /// Generations actually run.
    pub generations: usize,
    /// Best fitness of the population after each generation.
    pub history: Vec<f64>,
}

/// Evolutionary solver.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_timetable::ga::{EvolutionarySolver, GaConfig};
/// use u_timetable::models::{Faculty, Roster};
///
/// let roster = Roster::new()
///     .with_faculty(Faculty::new("A").with_subject("Math"))
///     .with_faculty(Faculty::new("B").with_subject("Physics"))
///     .with_division_count(2);
///
/// let config = GaConfig::default().with_generations(5).with_population_size(6);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let result = EvolutionarySolver::new(config).solve(&roster, &mut rng).unwrap();
/// assert_eq!(result.generations, 5);
/// ```
pub struct EvolutionarySolver {
    config: GaConfig,
    operators: GeneticOperators,
    fitness: Box<dyn FitnessFunction>,
    checker: ConstraintChecker,
    cancel: Option<Arc<AtomicBool>>,
}

impl EvolutionarySolver {
    /// Creates a solver with the configured fitness function.
    pub fn new(config: GaConfig) -> Self {
        Self {
            operators: GeneticOperators::from_config(&config),
            fitness: config.fitness_function(),
            checker: ConstraintChecker::strict(),
            cancel: None,
            config,
        }
    }

    /// Replaces the fitness function.
    pub fn with_fitness(mut self, fitness: Box<dyn FitnessFunction>) -> Self {
        self.fitness = fitness;
        self
    }

    /// Replaces the checker used by the seeding scheduler.
    pub fn with_checker(mut self, checker: ConstraintChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Stops the run at the next generation boundary once the flag is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Settings in use.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the search.
    ///
    /// # Errors
    /// Invalid roster or configuration.
    pub fn solve<R: Rng + ?Sized>(&self, roster: &Roster, rng: &mut R) -> Result<GaResult> {
        roster.validate()?;
        self.config.validate()?;

        let started = Instant::now();
        let size = self.config.population_size;
        info!(
            population = size,
            generations = self.config.generations,
            seeding = ?self.config.seeding,
            "running evolutionary solver"
        );

        let mut population = self.seed(roster, rng)?;
        let mut scores = self.evaluate(&population, roster);
        let mut history = Vec::with_capacity(self.config.generations);
        let mut generations = 0;

        for generation in 0..self.config.generations {
            if self.cancelled() {
                info!(generation, "evolutionary solver cancelled");
                break;
            }
            if self
                .config
                .time_limit()
                .is_some_and(|limit| started.elapsed() >= limit)
            {
                info!(generation, "evolutionary solver hit its time limit");
                break;
            }

            let parents = tournament_select(&population, &scores, self.config.tournament_size, rng);
            let offspring = self.breed(parents, rng)?;

            let keep = size.saturating_sub(offspring.len());
            let mut ranked: Vec<usize> = (0..population.len()).collect();
            ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
            let mut next: Vec<Schedule> = ranked
                .into_iter()
                .take(keep)
                .map(|i| population[i].clone())
                .collect();
            next.extend(offspring);

            population = next;
            scores = self.evaluate(&population, roster);
            generations += 1;

            let best = best_index(&scores).map(|i| scores[i]).unwrap_or(f64::NEG_INFINITY);
            history.push(best);
            debug!(generation, best, "generation done");
        }

        let best = best_index(&scores).unwrap_or(0);
        let best_fitness = scores.get(best).copied().unwrap_or(f64::NEG_INFINITY);
        info!(
            generations,
            best_fitness,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evolutionary solver finished"
        );

        Ok(GaResult {
            best: population.swap_remove(best),
            best_fitness,
            generations,
            history,
        })
    }

    fn seed<R: Rng + ?Sized>(&self, roster: &Roster, rng: &mut R) -> Result<Vec<Schedule>> {
        (0..self.config.population_size)
            .map(|_| -> Result<Schedule> {
                let outcome = match self.config.seeding {
                    Seeding::RoundRobin => RoundRobinScheduler::new()
                        .with_checker(self.checker)
                        .build(roster, rng)?,
                    Seeding::Rotation => RotationScheduler::new()
                        .with_checker(self.checker)
                        .build(roster, rng)?,
                };
                Ok(outcome.schedule)
            })
            .collect()
    }

    fn breed<R: Rng + ?Sized>(&self, parents: Vec<Schedule>, rng: &mut R) -> Result<Vec<Schedule>> {
        let mut offspring = Vec::with_capacity(parents.len());
        let mut parents = parents.into_iter();

        while let Some(first) = parents.next() {
            match parents.next() {
                Some(second) => {
                    let (mut c1, mut c2) = self.operators.crossover(&first, &second, rng)?;
                    self.operators.mutate(&mut c1, rng);
                    self.operators.mutate(&mut c2, rng);
                    offspring.push(c1);
                    offspring.push(c2);
                }
                None => {
                    let mut lone = first;
                    self.operators.mutate(&mut lone, rng);
                    offspring.push(lone);
                }
            }
        }

        Ok(offspring)
    }

    fn evaluate(&self, population: &[Schedule], roster: &Roster) -> Vec<f64> {
        let fitness = self.fitness.as_ref();
        if self.config.parallel {
            population
                .par_iter()
                .map(|s| fitness.evaluate(s, roster))
                .collect()
        } else {
            population.iter().map(|s| fitness.evaluate(s, roster)).collect()
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }
}

fn best_index(scores: &[f64]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
}
