//! Division (class section) model.

use serde::{Deserialize, Serialize};

/// Upper bound on the number of divisions in one roster.
pub const MAX_DIVISIONS: usize = 5;

/// A class section with its own weekly timetable and a fixed classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    /// Division number, `1..=division_count`.
    pub id: u32,
    /// Classroom used for every class of this division.
    pub classroom: String,
}

impl Division {
    /// Creates a division with an explicit classroom.
    pub fn new(id: u32, classroom: impl Into<String>) -> Self {
        Self {
            id,
            classroom: classroom.into(),
        }
    }

    /// Creates a division with the default classroom label `Classroom_<id>`.
    pub fn with_default_classroom(id: u32) -> Self {
        Self::new(id, format!("Classroom_{id}"))
    }
}
