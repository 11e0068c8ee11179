//! D-day computation for a project's end date.

use std::fmt;

use serde::Serialize;

use crate::types::Date;

/// Message returned when the project to compute against does not exist.
pub const DEADLINE_UNAVAILABLE: &str = "Cannot compute D-DAY";

/// Whole-day distance from today to a project's end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum Deadline {
    /// The end date is today.
    DueToday,
    /// The end date is this many days in the future.
    Remaining(i64),
    /// The end date was this many days ago.
    Overdue(i64),
}

impl Deadline {
    /// Classify `end` relative to `today`.
    pub fn between(today: Date, end: Date) -> Self {
        let days = end.signed_duration_since(today).num_days();
        match days {
            0 => Self::DueToday,
            d if d > 0 => Self::Remaining(d),
            d => Self::Overdue(-d),
        }
    }

    /// Human-readable message for the project page.
    pub fn message(self) -> String {
        match self {
            Self::DueToday => "D-DAY".to_string(),
            Self::Remaining(d) => format!("D-{d} remaining until the project deadline"),
            Self::Overdue(d) => format!("D+{d} passed since the project deadline"),
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
