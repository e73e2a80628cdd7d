//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration.
//!
//! ```toml
//! move_duration = "business_days"
//! group_move_duration = "calendar_days"
//! week_start = "Sun"
//!
//! [calendar]
//! weekend = ["Fri", "Sat"]
//! holidays = ["2024-12-25"]
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::dates::DurationMode;
use crate::error::EngineError;
use crate::models::WorkCalendar;

/// Settings shared by every engine command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length rule for moving an ungrouped item.
    #[serde(default)]
    pub move_duration: DurationMode,
    /// Length rule for each member when a grouped item moves.
    #[serde(default)]
    pub group_move_duration: DurationMode,
    /// First day of a week row.
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
    /// Working-day calendar for business-day durations.
    #[serde(default)]
    pub calendar: WorkCalendar,
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            move_duration: DurationMode::default(),
            group_move_duration: DurationMode::default(),
            week_start: default_week_start(),
            calendar: WorkCalendar::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(source)?)
    }

    /// Sets the duration rule for both grouped and ungrouped moves.
    pub fn with_duration_mode(mut self, mode: DurationMode) -> Self {
        self.move_duration = mode;
        self.group_move_duration = mode;
        self
    }

    /// Replaces the work calendar.
    pub fn with_calendar(mut self, calendar: WorkCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the first day of a week row.
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }
}
