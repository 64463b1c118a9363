//! Heuristic schedulers and KPI evaluation.
//!
//! Provides two fast placement heuristics and schedule quality metrics.
//!
//! # Algorithms
//!
//! - [`RoundRobinScheduler`]: two-phase greedy placement (diagonal pass,
//!   then gap filling) guarded by per-faculty claims.
//! - [`RotationScheduler`]: deterministic cyclic faculty rotation.
//!
//! Neither is complete: both return whatever they managed to place,
//! together with a [`PartialCoverage`] warning when slots stay empty.
//! They also seed the evolutionary search.
//!
//! # KPI
//!
//! [`TimetableKpi`] computes fill rate and per-faculty / per-day load.

mod kpi;
mod rotation;
mod round_robin;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, TimeSlot};

pub use kpi::TimetableKpi;
pub use rotation::RotationScheduler;
pub use round_robin::{ClaimGuard, ClaimTable, RoundRobinScheduler};

/// Teaching slots a heuristic left empty.
///
/// A warning, not an error: the schedule it accompanies is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCoverage {
    /// Empty `(division, slot)` pairs, division-major.
    pub unfilled: Vec<(u32, TimeSlot)>,
}

impl PartialCoverage {
    /// Collects the empty slots of a schedule. `None` when it is complete.
    pub fn from_schedule(schedule: &Schedule) -> Option<Self> {
        let unfilled = schedule.unfilled_slots();
        if unfilled.is_empty() {
            None
        } else {
            Some(Self { unfilled })
        }
    }

    /// Number of empty slots.
    pub fn len(&self) -> usize {
        self.unfilled.len()
    }

    /// Always false for a value built by [`from_schedule`](Self::from_schedule).
    pub fn is_empty(&self) -> bool {
        self.unfilled.is_empty()
    }

    /// Divisions with at least one empty slot, ascending.
    pub fn divisions(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.unfilled.iter().map(|(d, _)| *d).collect();
        ids.dedup();
        ids
    }
}

impl fmt::Display for PartialCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} teaching slot(s) left empty in division(s) {:?}",
            self.len(),
            self.divisions()
        )
    }
}

/// A heuristic's schedule plus its coverage warning.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    /// Everything that could be placed.
    pub schedule: Schedule,
    /// `None` only when every teaching slot of every division is filled.
    pub coverage: Option<PartialCoverage>,
}

impl PlacementOutcome {
    pub(crate) fn new(schedule: Schedule) -> Self {
        let coverage = PartialCoverage::from_schedule(&schedule);
        Self { schedule, coverage }
    }

    /// Whether the schedule is complete.
    pub fn is_complete(&self) -> bool {
        self.coverage.is_none()
    }
}
