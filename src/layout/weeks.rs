//! Week-row layout for month and multi-week calendar grids.
//!
//! A calendar grid draws one row per week. Each row is packed on its own,
//! so an item crossing a week boundary is drawn as two clipped bars whose
//! handles only appear on the real start and end.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{pack_lanes, LaneLayout};
use crate::dates::add_days;
use crate::models::{DateWindow, Item};

/// One packed week of a calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRow {
    /// Zero-based row index from the top of the grid.
    pub row: usize,
    /// Lane layout for the week.
    pub layout: LaneLayout,
}

/// Packs every week touching `range` (whole weeks starting on `week_start`).
pub fn layout_weeks(items: &[Item], range: &DateWindow, week_start: Weekday) -> Vec<WeekRow> {
    let mut rows = Vec::new();
    let mut week = DateWindow::week_containing(range.start, week_start);
    loop {
        rows.push(WeekRow {
            row: rows.len(),
            layout: pack_lanes(&week, items),
        });
        if week.end >= range.end {
            break;
        }
        let next_start = add_days(week.end, 1);
        if next_start == week.end {
            break;
        }
        week = DateWindow::new(next_start, add_days(next_start, 6));
    }
    rows
}
