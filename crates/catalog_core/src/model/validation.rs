//! Field-level validation outcomes.
//!
//! Violations are collected when a write is staged and reported together
//! when the unit of work saves.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// One broken rule on one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub property: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(property: &'static str, message: impl Into<String>) -> Self {
        Self {
            property,
            message: message.into(),
        }
    }
}

/// Change-tracking state of a staged write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Added,
    Modified,
    Deleted,
}

impl EntryState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Modified => "Modified",
            Self::Deleted => "Deleted",
        }
    }
}

/// All violations reported for one staged entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityViolations {
    pub entity: &'static str,
    pub id: Uuid,
    pub state: EntryState,
    pub violations: Vec<FieldViolation>,
}

/// Validation failure raised by `UnitOfWork::save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub entries: Vec<EntityViolations>,
}

impl ValidationFailure {
    /// Total number of field violations across all entities.
    pub fn violation_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.violations.len()).sum()
    }

    /// Renders diagnostic lines, one header per entity followed by one line
    /// per violated property.
    pub fn diagnostic_lines(&self, timestamp_ms: u128) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + self.violation_count());
        for entry in &self.entries {
            lines.push(format!(
                "{timestamp_ms}: Entity of type \"{}\" in state \"{}\" has the following validation errors:",
                entry.entity,
                entry.state.as_str()
            ));
            for violation in &entry.violations {
                lines.push(format!(
                    "- Property: \"{}\", Error: \"{}\"",
                    violation.property, violation.message
                ));
            }
        }
        lines
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "validation failed for {} entit{} ({} violation{})",
            self.entries.len(),
            if self.entries.len() == 1 { "y" } else { "ies" },
            self.violation_count(),
            if self.violation_count() == 1 { "" } else { "s" }
        )
    }
}

impl Error for ValidationFailure {}
