//! Item (schedulable unit) model.
//!
//! An item is a named, inclusive day range with an optional predecessor
//! link and an optional group membership. The engine owns its dates and
//! links; the payload is carried through every transformation untouched.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GroupId;
use crate::dates::{add_days, day_difference};

/// Item identifier. Assigned by the timeline, never reused.
pub type ItemId = u64;

/// A date-ranged unit of work.
///
/// # Invariant
/// `start <= end`. Both constructors order the bounds, and every engine
/// operation preserves the ordering by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Display label (non-empty after trim).
    pub name: String,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
    /// Item that should finish before this one starts. May dangle.
    #[serde(default)]
    pub predecessor_id: Option<ItemId>,
    /// Group this item moves with.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Caller-owned fields the engine never interprets.
    #[serde(default)]
    pub payload: ItemPayload,
}

/// Opaque item payload, preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPayload {
    /// Completion percentage as entered by the user.
    #[serde(default)]
    pub progress: u8,
    /// Executing unit / category label.
    #[serde(default)]
    pub executing_unit: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Domain-specific key-value metadata.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Item {
    /// Creates an ungrouped item without a predecessor.
    pub fn new(id: ItemId, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start: start.min(end),
            end: start.max(end),
            predecessor_id: None,
            group_id: None,
            payload: ItemPayload::default(),
        }
    }

    /// Creates a one-day item.
    pub fn on_day(id: ItemId, name: impl Into<String>, day: NaiveDate) -> Self {
        Self::new(id, name, day, day)
    }

    /// Sets the predecessor.
    pub fn with_predecessor(mut self, predecessor_id: ItemId) -> Self {
        self.predecessor_id = Some(predecessor_id);
        self
    }

    /// Replaces the payload.
    pub fn with_payload(mut self, payload: ItemPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Sets the progress percentage.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.payload.progress = progress;
        self
    }

    /// Sets the executing unit.
    pub fn with_executing_unit(mut self, unit: impl Into<String>) -> Self {
        self.payload.executing_unit = Some(unit.into());
        self
    }

    /// Calendar-day length, `end - start` (0 for a one-day item).
    #[inline]
    pub fn calendar_days(&self) -> i64 {
        day_difference(self.end, self.start)
    }

    /// Number of days covered, inclusive (1 for a one-day item).
    #[inline]
    pub fn span_days(&self) -> i64 {
        self.calendar_days() + 1
    }

    /// Whether the two items share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether the item belongs to a group.
    #[inline]
    pub fn is_grouped(&self) -> bool {
        self.group_id.is_some()
    }

    /// Copy with both bounds shifted by `delta` days.
    pub fn shifted(&self, delta: i64) -> Self {
        Self {
            start: add_days(self.start, delta),
            end: add_days(self.end, delta),
            ..self.clone()
        }
    }

    /// Copy with new bounds (ordered).
    pub fn with_dates(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            ..self.clone()
        }
    }
}
