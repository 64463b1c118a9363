//! Timetabling domain models.
//!
//! Provides the core data types for describing a weekly class timetabling
//! problem and its solutions.
//!
//! # Domain Mappings
//!
//! | u-timetable | College | School | Training centre |
//! |-------------|---------|--------|-----------------|
//! | Faculty | Professor | Teacher | Trainer |
//! | Subject | Course | Lesson | Module |
//! | Division | Section | Class | Cohort |
//! | Schedule | Timetable | Timetable | Session plan |

pub mod calendar;
mod division;
mod faculty;
mod roster;
mod schedule;

pub use calendar::{BreakMarker, TimeSlot, MAX_DAYS};
pub use division::{Division, MAX_DIVISIONS};
pub use faculty::{Faculty, Subject};
pub use roster::Roster;
pub use schedule::{class_name, Assignment, Schedule, Timetable, Violation, ViolationType};
