//! Engine configuration.
//!
//! Load solver settings from TOML to pick a strategy and tune it without
//! code changes. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! # Examples
//!
//! ```
//! use u_timetable::config::{EngineConfig, Strategy};
//! use std::time::Duration;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     strategy = "evolutionary"
//!     random_seed = 7
//!
//!     [exact]
//!     enforce_faculty_exclusivity = false
//!
//!     [evolution]
//!     population_size = 30
//!     generations = 50
//!     time_limit_secs = 10
//! "#).unwrap();
//!
//! assert_eq!(config.strategy, Strategy::Evolutionary);
//! assert_eq!(config.evolution.population_size, 30);
//! assert_eq!(config.evolution.time_limit(), Some(Duration::from_secs(10)));
//! assert!(!config.exact.enforce_faculty_exclusivity);
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use u_timetable::config::EngineConfig;
//!
//! let config = EngineConfig::load("timetable.toml").unwrap_or_default();
//! assert!(config.validate().is_ok());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ga::GaConfig;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Solving strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// SAT encoding, solved exactly.
    Exact,
    /// Two-phase greedy placement with per-faculty claims.
    RoundRobin,
    /// Deterministic cyclic faculty rotation.
    Rotation,
    /// Population search seeded by a heuristic scheduler.
    #[default]
    Evolutionary,
}

/// Exact solver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Forbid a faculty member in two divisions at one slot.
    pub enforce_faculty_exclusivity: bool,
    /// Largest number of decision variables the solver will accept.
    pub max_variables: usize,
    /// Largest number of clauses the solver will accept.
    pub max_clauses: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            enforce_faculty_exclusivity: true,
            max_variables: 200_000,
            max_clauses: 2_000_000,
        }
    }
}

/// Heuristic placement settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRobinConfig {
    /// Reject a subject already running at the same slot in another division.
    pub forbid_cross_division_subject: bool,
}

impl Default for RoundRobinConfig {
    fn default() -> Self {
        Self {
            forbid_cross_division_subject: true,
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Strategy used by [`TimetableEngine::solve`](crate::engine::TimetableEngine::solve).
    pub strategy: Strategy,
    /// Random seed for reproducible results. `None` draws a fresh seed.
    pub random_seed: Option<u64>,
    /// Exact solver settings.
    pub exact: ExactConfig,
    /// Heuristic placement settings.
    pub round_robin: RoundRobinConfig,
    /// Evolutionary search settings.
    pub evolution: GaConfig,
}

impl EngineConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the exact solver settings.
    pub fn with_exact(mut self, exact: ExactConfig) -> Self {
        self.exact = exact;
        self
    }

    /// Sets the heuristic placement settings.
    pub fn with_round_robin(mut self, round_robin: RoundRobinConfig) -> Self {
        self.round_robin = round_robin;
        self
    }

    /// Sets the evolutionary search settings.
    pub fn with_evolution(mut self, evolution: GaConfig) -> Self {
        self.evolution = evolution;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exact.max_variables == 0 {
            return Err(ConfigError::Invalid(
                "exact.max_variables must be positive".into(),
            ));
        }
        if self.exact.max_clauses == 0 {
            return Err(ConfigError::Invalid("exact.max_clauses must be positive".into()));
        }
        self.evolution.validate()
    }
}
