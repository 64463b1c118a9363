//! Weekly class timetabling for the U-Engine ecosystem.
//!
//! Assigns faculty-taught subjects to the slots of a fixed weekly grid
//! across several class divisions, so that no faculty member is in two
//! places at once and every division slot holds at most one class.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Faculty`, `Subject`, `Division`,
//!   `TimeSlot`, `Roster`, `Assignment`, `Timetable`, `Schedule`
//! - **`validation`**: Roster integrity checks (duplicates, ownership,
//!   division numbering, names)
//! - **`checker`**: Placement predicate and schedule audit
//! - **`cp`**: Exact solver (SAT encoding, `varisat`)
//! - **`scheduler`**: Round-robin and rotation heuristics, KPIs
//! - **`ga`**: Evolutionary refinement
//! - **`grid`**: Plain-text grid rendering and parsing
//! - **`engine`**: Strategy selection driven by `config`
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_timetable::models::{Faculty, Roster};
//! use u_timetable::scheduler::RoundRobinScheduler;
//!
//! let roster = Roster::new()
//!     .with_faculty(Faculty::new("Rao").with_subjects(["Math", "Statistics"]))
//!     .with_faculty(Faculty::new("Iyer").with_subject("Physics"))
//!     .with_division_count(2);
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let outcome = RoundRobinScheduler::new().schedule(&roster, &mut rng).unwrap();
//! println!("{}", u_timetable::grid::render_schedule(&outcome.schedule));
//! ```
//!
//! # Logging
//!
//! Solvers log through `tracing`. The crate never installs a subscriber.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod checker;
pub mod config;
pub mod cp;
pub mod engine;
pub mod error;
pub mod ga;
pub mod grid;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, TimetableError};
