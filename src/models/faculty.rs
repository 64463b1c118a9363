//! Faculty and subject models.
//!
//! A faculty member is identified by name and owns an ordered list of
//! subjects. Each subject records its owner, so ownership can be checked
//! on assignments without a lookup table.

use serde::{Deserialize, Serialize};

/// A subject taught by exactly one faculty member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name.
    pub name: String,
    /// Name of the owning faculty member.
    pub faculty: String,
}

/// A faculty member and the subjects they may teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier (name).
    pub name: String,
    /// Subjects in roster order.
    pub subjects: Vec<Subject>,
}

impl Subject {
    /// Creates a subject owned by `faculty`.
    pub fn new(name: impl Into<String>, faculty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faculty: faculty.into(),
        }
    }
}

impl Faculty {
    /// Creates a faculty member with no subjects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subjects: Vec::new(),
        }
    }

    /// Adds a subject owned by this faculty member.
    pub fn with_subject(mut self, name: impl Into<String>) -> Self {
        let subject = Subject::new(name, self.name.clone());
        self.subjects.push(subject);
        self
    }

    /// Adds several subjects in order.
    pub fn with_subjects<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self = self.with_subject(name);
        }
        self
    }

    /// Whether this faculty member teaches a subject of the given name.
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s.name == subject)
    }

    /// Whether the faculty member has at least one subject.
    #[inline]
    pub fn has_subjects(&self) -> bool {
        !self.subjects.is_empty()
    }
}
