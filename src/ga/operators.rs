//! Genetic operators for schedules.
//!
//! Provides tournament selection, two-point day crossover and intra-day
//! swap mutation, plus [`GeneticOperators`] bundling the configured
//! mutation settings.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::GeneticOperators;
//! use u_timetable::ga::MutationMode;
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.mutation_mode, MutationMode::SlotExchange);
//! assert!((ops.mutation_rate - 0.2).abs() < 1e-12);
//! ```

use std::cmp::Ordering;

use rand::Rng;

use super::{GaConfig, MutationMode};
use crate::error::{Result, TimetableError};
use crate::models::calendar::teaching_days;
use crate::models::{Schedule, MAX_DAYS};

/// Picks `population.len()` winners of size-`k` tournaments.
///
/// Members are drawn with replacement, independently per draw. Ties keep
/// the first drawn. Winners are deep clones.
pub fn tournament_select<R: Rng + ?Sized>(
    population: &[Schedule],
    fitness: &[f64],
    k: usize,
    rng: &mut R,
) -> Vec<Schedule> {
    let n = population.len().min(fitness.len());
    if n == 0 {
        return Vec::new();
    }

    (0..n)
        .map(|_| {
            let mut best = rng.random_range(0..n);
            for _ in 1..k.max(1) {
                let challenger = rng.random_range(0..n);
                if fitness[challenger].total_cmp(&fitness[best]) == Ordering::Greater {
                    best = challenger;
                }
            }
            population[best].clone()
        })
        .collect()
}

/// Two-point crossover with random cut points `1 <= p1 < p2 <= MAX_DAYS - 1`.
///
/// The last day of the week is never exchanged.
pub fn two_point_crossover<R: Rng + ?Sized>(
    parent1: &Schedule,
    parent2: &Schedule,
    rng: &mut R,
) -> Result<(Schedule, Schedule)> {
    let point1 = rng.random_range(1..MAX_DAYS - 1);
    let point2 = rng.random_range(point1 + 1..MAX_DAYS);
    crossover_at(parent1, parent2, point1, point2)
}

/// Swaps every division's day lists for days in `[point1, point2)`.
///
/// Other days are copied unchanged. `point2` is capped at `MAX_DAYS`;
/// an empty range yields copies of the parents.
///
/// # Errors
/// `DivisionMismatch` when the parents hold different divisions.
pub fn crossover_at(
    parent1: &Schedule,
    parent2: &Schedule,
    point1: usize,
    point2: usize,
) -> Result<(Schedule, Schedule)> {
    let left = parent1.division_ids();
    let right = parent2.division_ids();
    if left != right {
        return Err(TimetableError::DivisionMismatch { left, right });
    }

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    let point1 = point1.max(1);
    let point2 = point2.min(MAX_DAYS);

    for division in left {
        let (Some(t1), Some(t2)) = (parent1.timetable(division), parent2.timetable(division)) else {
            continue;
        };
        for day in point1..point2 {
            let day = day as u8;
            if let Some(c1) = child1.timetable_mut(division) {
                c1.replace_day(day, t2.day(day).to_vec());
            }
            if let Some(c2) = child2.timetable_mut(division) {
                c2.replace_day(day, t1.day(day).to_vec());
            }
        }
    }

    Ok((child1, child2))
}

/// Mutates every division's teaching days with probability `rate` each.
///
/// A mutated day with at least two assignments has two distinct ones
/// picked uniformly and swapped according to `mode`. A `rate` outside
/// `0.0..=1.0` (or NaN) leaves the schedule untouched.
pub fn mutate<R: Rng + ?Sized>(schedule: &mut Schedule, mode: MutationMode, rate: f64, rng: &mut R) {
    if !(0.0..=1.0).contains(&rate) {
        return;
    }
    for timetable in schedule.timetables_mut() {
        for day in teaching_days() {
            if !rng.random_bool(rate) {
                continue;
            }
            let len = timetable.day(day).len();
            if len < 2 {
                continue;
            }
            let i = rng.random_range(0..len);
            let mut j = rng.random_range(0..len - 1);
            if j >= i {
                j += 1;
            }
            match mode {
                MutationMode::Reorder => timetable.swap_positions(day, i, j),
                MutationMode::SlotExchange => timetable.exchange_slots(day, i, j),
            }
        }
    }
}

/// Configured crossover and mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticOperators {
    /// Mutation semantics.
    pub mutation_mode: MutationMode,
    /// Per-division, per-day mutation probability (0.0..=1.0).
    pub mutation_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self::from_config(&GaConfig::default())
    }
}

impl GeneticOperators {
    /// Takes the operator settings of a GA configuration.
    pub fn from_config(config: &GaConfig) -> Self {
        Self {
            mutation_mode: config.mutation_mode,
            mutation_rate: if config.mutation_rate.is_nan() {
                0.0
            } else {
                config.mutation_rate.clamp(0.0, 1.0)
            },
        }
    }

    /// Performs two-point crossover.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        p1: &Schedule,
        p2: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule)> {
        two_point_crossover(p1, p2, rng)
    }

    /// Performs mutation.
    pub fn mutate<R: Rng + ?Sized>(&self, schedule: &mut Schedule, rng: &mut R) {
        mutate(schedule, self.mutation_mode, self.mutation_rate, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::teaching_slots;
    use crate::models::{Assignment, TimeSlot, Timetable};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn uniform(faculty: &str, subject: &str) -> Schedule {
        let mut s = Schedule::new();
        for division in 1..=2 {
            s.add_timetable(Timetable::new(division, format!("R{division}")));
            for slot in teaching_slots() {
                s.place(Assignment::new(division, slot, faculty, subject, format!("R{division}")))
                    .unwrap();
            }
        }
        s
    }

    fn faculty_on(s: &Schedule, division: u32, day: u8) -> Vec<&str> {
        s.timetable(division)
            .unwrap()
            .day(day)
            .iter()
            .map(|a| a.faculty.as_str())
            .collect()
    }

    #[test]
    fn test_crossover_at_swaps_range() {
        let p1 = uniform("A", "Math");
        let p2 = uniform("B", "Physics");
        let (c1, c2) = crossover_at(&p1, &p2, 2, 5).unwrap();

        for division in 1..=2 {
            for day in 1..=6u8 {
                let (from1, from2) = if (2..5).contains(&day) { ("B", "A") } else { ("A", "B") };
                assert!(faculty_on(&c1, division, day).iter().all(|f| *f == from1));
                assert!(faculty_on(&c2, division, day).iter().all(|f| *f == from2));
                assert_eq!(
                    c1.timetable(division).unwrap().day_count(day),
                    c1.timetable(division).unwrap().day(day).len()
                );
            }
        }
        // parents untouched
        assert!(p1.assignments().all(|a| a.faculty == "A"));
    }

    #[test]
    fn test_crossover_never_exchanges_saturday() {
        let p1 = uniform("A", "Math");
        let p2 = uniform("B", "Physics");
        let mut rng = SmallRng::seed_from_u64(42);
        let mut friday_swapped = false;

        for _ in 0..200 {
            let (c1, c2) = two_point_crossover(&p1, &p2, &mut rng).unwrap();
            for division in 1..=2 {
                assert!(faculty_on(&c1, division, 6).iter().all(|f| *f == "A"));
                assert!(faculty_on(&c2, division, 6).iter().all(|f| *f == "B"));
            }
            friday_swapped |= faculty_on(&c1, 1, 5)[0] == "B";
        }
        // the range still reaches the day before Saturday
        assert!(friday_swapped);
    }

    #[test]
    fn test_crossover_closure() {
        let p1 = uniform("A", "Math");
        let p2 = uniform("B", "Physics");
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let (c1, c2) = two_point_crossover(&p1, &p2, &mut rng).unwrap();

            // days 1..6 form at most three contiguous runs, each from one parent
            let origin: Vec<&str> = (1..=6u8).map(|d| faculty_on(&c1, 1, d)[0]).collect();
            let runs = 1 + origin.windows(2).filter(|w| w[0] != w[1]).count();
            assert!(runs <= 3);

            // both children together hold exactly the parents' content per day
            for division in 1..=2 {
                for day in 1..=6u8 {
                    let mut merged = faculty_on(&c1, division, day);
                    merged.extend(faculty_on(&c2, division, day));
                    merged.sort_unstable();
                    let mut expected = faculty_on(&p1, division, day);
                    expected.extend(faculty_on(&p2, division, day));
                    expected.sort_unstable();
                    assert_eq!(merged, expected);
                }
            }

            // same cut points for every division
            for day in 1..=6u8 {
                assert_eq!(faculty_on(&c1, 1, day)[0], faculty_on(&c1, 2, day)[0]);
            }
        }
    }

    #[test]
    fn test_crossover_division_mismatch() {
        let p1 = uniform("A", "Math");
        let mut p2 = Schedule::new();
        p2.add_timetable(Timetable::new(1, "R1"));
        assert!(matches!(
            crossover_at(&p1, &p2, 1, 3),
            Err(TimetableError::DivisionMismatch { .. })
        ));
    }

    #[test]
    fn test_tournament_prefers_fitter() {
        let population = vec![uniform("A", "Math"), uniform("B", "Physics")];
        let fitness = vec![-10.0, 0.0];
        let mut rng = SmallRng::seed_from_u64(42);

        let pool = tournament_select(&population, &fitness, 64, &mut rng);
        assert_eq!(pool.len(), 2);
        assert!(pool
            .iter()
            .all(|s| s.assignments().all(|a| a.faculty == "B")));

        // k = 1 is plain random sampling
        let pool = tournament_select(&population, &fitness, 1, &mut rng);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_reorder_keeps_slot_content() {
        let mut s = Schedule::new();
        s.add_timetable(Timetable::new(1, "R1"));
        for (i, f) in ["A", "B", "C"].iter().enumerate() {
            let slot = TimeSlot::new(1, i as u8).unwrap();
            s.place(Assignment::new(1, slot, *f, "X", "R1")).unwrap();
        }
        let before: Vec<(TimeSlot, String)> = s
            .assignments()
            .map(|a| (a.slot, a.faculty.clone()))
            .collect();

        let mut rng = SmallRng::seed_from_u64(42);
        mutate(&mut s, MutationMode::Reorder, 1.0, &mut rng);

        let mut after: Vec<(TimeSlot, String)> = s
            .assignments()
            .map(|a| (a.slot, a.faculty.clone()))
            .collect();
        after.sort();
        assert_eq!(after, before);
        // list order changed
        let listed: Vec<u8> = s.timetable(1).unwrap().day(1).iter().map(|a| a.slot.index()).collect();
        assert_ne!(listed, vec![0, 1, 2]);
    }

    #[test]
    fn test_slot_exchange_moves_faculty() {
        let mut s = Schedule::new();
        s.add_timetable(Timetable::new(1, "R1"));
        for (i, f) in ["A", "B"].iter().enumerate() {
            let slot = TimeSlot::new(1, i as u8).unwrap();
            s.place(Assignment::new(1, slot, *f, "X", "R1")).unwrap();
        }

        let mut rng = SmallRng::seed_from_u64(42);
        mutate(&mut s, MutationMode::SlotExchange, 1.0, &mut rng);

        let t = s.timetable(1).unwrap();
        assert_eq!(t.assignment_at(TimeSlot::new(1, 0).unwrap()).unwrap().faculty, "B");
        assert_eq!(t.assignment_at(TimeSlot::new(1, 1).unwrap()).unwrap().faculty, "A");
        assert_eq!(t.day_count(1), 2);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let original = uniform("A", "Math");
        let mut s = original.clone();
        let mut rng = SmallRng::seed_from_u64(42);
        mutate(&mut s, MutationMode::SlotExchange, 0.0, &mut rng);
        assert_eq!(s, original);
    }

    #[test]
    fn test_out_of_range_rate_is_identity() {
        let mut s = Schedule::new();
        s.add_timetable(Timetable::new(1, "R1"));
        for (i, f) in ["A", "B"].iter().enumerate() {
            let slot = TimeSlot::new(1, i as u8).unwrap();
            s.place(Assignment::new(1, slot, *f, "X", "R1")).unwrap();
        }
        let original = s.clone();
        let mut rng = SmallRng::seed_from_u64(42);

        for rate in [f64::NAN, 1.5, -0.5] {
            mutate(&mut s, MutationMode::SlotExchange, rate, &mut rng);
            assert_eq!(s, original);
        }

        let ops = GeneticOperators::from_config(&GaConfig::default().with_mutation_rate(f64::NAN));
        assert!((ops.mutation_rate).abs() < 1e-12);
        ops.mutate(&mut s, &mut rng);
        assert_eq!(s, original);
    }
}
