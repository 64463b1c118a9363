//! Weekly calendar model.
//!
//! Defines the fixed teaching grid every timetable is laid out on.
//!
//! # Grid
//!
//! | Day | Name | Teaching slots |
//! |-----|------|----------------|
//! | 0 | Sunday | none (holiday) |
//! | 1-5 | Monday-Friday | 6 |
//! | 6 | Saturday | 5 (half day) |
//!
//! Slot labels are fixed literal times. Two label positions mark break
//! insertion points for presentation (`"11:15 AM"` breakfast, `"1:15 PM"`
//! lunch); they never remove a teaching slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TimetableError};

/// Number of days in the weekly grid, holiday included.
pub const MAX_DAYS: usize = 7;

/// The holiday. Never holds assignments.
pub const HOLIDAY: u8 = 0;

/// The half day.
pub const SATURDAY: u8 = 6;

/// Slot labels of a full teaching day, in order.
pub const SLOT_LABELS: [&str; 6] = [
    "8:00 AM", "9:00 AM", "10:00 AM", "11:15 AM", "12:15 PM", "2:00 PM",
];

/// Day names indexed by day number.
pub const DAY_NAMES: [&str; MAX_DAYS] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const SATURDAY_SLOTS: usize = 5;

/// A presentation-only break banner inserted before a slot row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakMarker {
    /// Reserved label position that triggers the banner.
    pub label: &'static str,
    /// Index of the first teaching slot after the break.
    pub before_slot: usize,
    /// Banner text spanning all day columns.
    pub banner: &'static str,
}

/// Breakfast and lunch banners, in row order.
pub const BREAKS: [BreakMarker; 2] = [
    BreakMarker {
        label: "11:15 AM",
        before_slot: 3,
        banner: "Breakfast Break(11:00-11:15)",
    },
    BreakMarker {
        label: "1:15 PM",
        before_slot: 5,
        banner: "Lunch Break(1:15-2:00)",
    },
];

/// Number of teaching slots on a day (0 for the holiday or an invalid day).
#[inline]
pub fn slots_on(day: u8) -> usize {
    match day {
        1..=5 => SLOT_LABELS.len(),
        SATURDAY => SATURDAY_SLOTS,
        _ => 0,
    }
}

/// Teaching days in order (Monday through Saturday).
pub fn teaching_days() -> impl Iterator<Item = u8> {
    1..MAX_DAYS as u8
}

/// Every teaching slot of the week, day-major.
pub fn teaching_slots() -> impl Iterator<Item = TimeSlot> {
    teaching_days().flat_map(|day| (0..slots_on(day) as u8).map(move |index| TimeSlot { day, index }))
}

/// Total number of teaching slots per division per week.
pub fn slots_per_week() -> usize {
    teaching_days().map(slots_on).sum()
}

/// A (day, slot index) coordinate in the weekly grid.
///
/// Only constructible inside the teaching grid, so holding a `TimeSlot`
/// means day 0 and Saturday slot 5 are already excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot", into = "RawTimeSlot")]
pub struct TimeSlot {
    day: u8,
    index: u8,
}

impl TimeSlot {
    /// Creates a slot, rejecting coordinates outside the teaching grid.
    pub fn new(day: u8, index: u8) -> Result<Self> {
        if (index as usize) < slots_on(day) {
            Ok(Self { day, index })
        } else {
            Err(TimetableError::InvalidIndex { day, slot: index })
        }
    }

    /// Day number (1 = Monday .. 6 = Saturday).
    #[inline]
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Slot index within the day.
    #[inline]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Literal time label of this slot.
    pub fn label(&self) -> &'static str {
        SLOT_LABELS[self.index as usize]
    }

    /// Name of this slot's day.
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.day as usize]
    }

    /// Finds the slot index carrying a label on a given day.
    pub fn from_label(day: u8, label: &str) -> Result<Self> {
        let index = SLOT_LABELS
            .iter()
            .take(slots_on(day))
            .position(|l| *l == label)
            .ok_or(TimetableError::InvalidIndex {
                day,
                slot: u8::MAX,
            })?;
        Self::new(day, index as u8)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_name(), self.label())
    }
}

#[derive(Serialize, Deserialize)]
struct RawTimeSlot {
    day: u8,
    index: u8,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = TimetableError;

    fn try_from(raw: RawTimeSlot) -> Result<Self> {
        TimeSlot::new(raw.day, raw.index)
    }
}

impl From<TimeSlot> for RawTimeSlot {
    fn from(slot: TimeSlot) -> Self {
        Self {
            day: slot.day,
            index: slot.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_per_day() {
        assert_eq!(slots_on(HOLIDAY), 0);
        for day in 1..=5 {
            assert_eq!(slots_on(day), 6);
        }
        assert_eq!(slots_on(SATURDAY), 5);
        assert_eq!(slots_on(7), 0);
    }

    #[test]
    fn test_slots_per_week() {
        assert_eq!(slots_per_week(), 35);
        assert_eq!(teaching_slots().count(), 35);
    }

    #[test]
    fn test_time_slot_bounds() {
        assert!(TimeSlot::new(1, 0).is_ok());
        assert!(TimeSlot::new(5, 5).is_ok());
        assert!(TimeSlot::new(6, 4).is_ok());

        assert!(matches!(
            TimeSlot::new(0, 0),
            Err(TimetableError::InvalidIndex { day: 0, slot: 0 })
        ));
        assert!(matches!(
            TimeSlot::new(6, 5),
            Err(TimetableError::InvalidIndex { day: 6, slot: 5 })
        ));
        assert!(TimeSlot::new(7, 0).is_err());
        assert!(TimeSlot::new(1, 6).is_err());
    }

    #[test]
    fn test_labels_and_names() {
        let slot = TimeSlot::new(1, 3).unwrap();
        assert_eq!(slot.label(), "11:15 AM");
        assert_eq!(slot.day_name(), "Monday");
        assert_eq!(slot.to_string(), "Monday 11:15 AM");
    }

    #[test]
    fn test_from_label() {
        let slot = TimeSlot::from_label(2, "2:00 PM").unwrap();
        assert_eq!((slot.day(), slot.index()), (2, 5));
        // Saturday has no 2:00 PM slot
        assert!(TimeSlot::from_label(SATURDAY, "2:00 PM").is_err());
        assert!(TimeSlot::from_label(1, "1:15 PM").is_err());
    }

    #[test]
    fn test_teaching_slots_never_touch_holiday() {
        assert!(teaching_slots().all(|s| s.day() != HOLIDAY));
        assert!(teaching_slots()
            .filter(|s| s.day() == SATURDAY)
            .all(|s| s.index() < 5));
    }

    #[test]
    fn test_serde_rejects_out_of_grid_slot() {
        let ok: TimeSlot = serde_json::from_str(r#"{"day":3,"index":2}"#).unwrap();
        assert_eq!((ok.day(), ok.index()), (3, 2));
        assert!(serde_json::from_str::<TimeSlot>(r#"{"day":0,"index":0}"#).is_err());
    }
}
