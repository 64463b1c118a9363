//! Error types for timetable construction and solving.
//!
//! Partial coverage is deliberately absent here: a heuristic that leaves
//! slots empty still returns its schedule, together with a
//! [`PartialCoverage`](crate::scheduler::PartialCoverage) warning.

use thiserror::Error;

use crate::config::ConfigError;
use crate::validation::ValidationError;

/// Errors raised by the timetable engine.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// No faculty, or no subject across the whole roster.
    #[error("empty roster: {0}")]
    EmptyRoster(String),

    /// The roster failed structural validation.
    #[error("invalid roster: {} problem(s), first: {}", .0.len(), first_message(.0))]
    InvalidRoster(Vec<ValidationError>),

    /// The exact solver proved that no assignment satisfies the model.
    #[error(
        "no feasible timetable: {divisions} division(s), {slots} teaching slot(s) each, {pairs} faculty/subject pair(s)"
    )]
    InfeasibleSchedule {
        divisions: usize,
        slots: usize,
        pairs: usize,
    },

    /// Day or slot index outside the weekly grid.
    #[error("invalid time slot index: day {day}, slot {slot}")]
    InvalidIndex { day: u8, slot: u8 },

    /// The SAT encoding would exceed the configured variable budget.
    #[error("model too large: {variables} variables exceeds budget of {limit}")]
    BudgetExceeded { variables: usize, limit: usize },

    /// The SAT encoding would exceed the configured clause budget.
    #[error("model too large: {clauses} clauses exceeds budget of {limit}")]
    ClauseBudgetExceeded { clauses: usize, limit: usize },

    /// Two schedules combined by crossover do not cover the same divisions.
    #[error("division sets differ between parents: {left:?} vs {right:?}")]
    DivisionMismatch { left: Vec<u32>, right: Vec<u32> },

    /// A placement referenced a division the schedule does not hold.
    #[error("unknown division {0}")]
    UnknownDivision(u32),

    /// The SAT backend failed for a reason other than unsatisfiability.
    #[error("solver error: {0}")]
    Solver(String),

    /// A text grid could not be parsed back into a timetable.
    #[error("grid parse error at line {line}: {message}")]
    GridParse { line: usize, message: String },

    /// Configuration could not be loaded or is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;
