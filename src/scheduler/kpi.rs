//! Timetable quality metrics (KPIs).
//!
//! Computes coverage and load-balance indicators from a schedule and its
//! roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill rate | Filled teaching slots / capacity |
//! | Faculty load | Assignments per faculty member |
//! | Day load | Assignments per teaching day, all divisions |
//! | Faculty spread | max - min faculty load over teaching faculty |
//! | Day spread | max - min per-day fill ratio |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::calendar::{slots_on, slots_per_week, teaching_days};
use crate::models::{Roster, Schedule};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableKpi {
    /// Number of assignments.
    pub filled: usize,
    /// Teaching slots across all divisions.
    pub capacity: usize,
    /// Fraction of capacity filled (0.0..1.0).
    pub fill_rate: f64,
    /// Assignments per faculty member (every roster member listed).
    pub load_by_faculty: BTreeMap<String, usize>,
    /// Assignments per teaching day, summed over divisions.
    pub load_by_day: BTreeMap<u8, usize>,
    /// Largest minus smallest load among faculty with subjects.
    pub faculty_load_spread: f64,
    /// Largest minus smallest per-day fill ratio.
    pub day_load_spread: f64,
}

impl TimetableKpi {
    /// Computes KPIs from a schedule and its roster.
    pub fn calculate(schedule: &Schedule, roster: &Roster) -> Self {
        let divisions = schedule.division_ids().len();
        let capacity = divisions * slots_per_week();
        let filled = schedule.assignment_count();

        let mut load_by_faculty: BTreeMap<String, usize> = roster
            .faculty
            .iter()
            .map(|f| (f.name.clone(), 0))
            .collect();
        let mut load_by_day: BTreeMap<u8, usize> = teaching_days().map(|d| (d, 0)).collect();

        for a in schedule.assignments() {
            *load_by_faculty.entry(a.faculty.clone()).or_insert(0) += 1;
            *load_by_day.entry(a.slot.day()).or_insert(0) += 1;
        }

        let teaching_loads = roster
            .faculty
            .iter()
            .filter(|f| f.has_subjects())
            .filter_map(|f| load_by_faculty.get(&f.name).copied());
        let faculty_load_spread = spread(teaching_loads.map(|l| l as f64));

        let day_load_spread = if divisions == 0 {
            0.0
        } else {
            spread(teaching_days().map(|d| {
                let load = load_by_day.get(&d).copied().unwrap_or(0);
                load as f64 / (slots_on(d) * divisions) as f64
            }))
        };

        Self {
            filled,
            capacity,
            fill_rate: if capacity > 0 {
                filled as f64 / capacity as f64
            } else {
                0.0
            },
            load_by_faculty,
            load_by_day,
            faculty_load_spread,
            day_load_spread,
        }
    }

    /// Combined spread used as the load-balance penalty.
    pub fn imbalance(&self) -> f64 {
        self.faculty_load_spread + self.day_load_spread
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if max >= min {
        max - min
    } else {
        0.0
    }
}
