//! Move and resize.
//!
//! # Move
//! `delta = new_start - item.start`. A grouped item drags its whole group
//! by `delta`; an ungrouped item moves alone. Each moved item keeps its
//! length under the configured [`DurationMode`](crate::dates::DurationMode).
//! A zero delta changes nothing, which makes repeated moves to the same
//! target idempotent.
//!
//! # Resize
//! Moves one boundary of one item. The moved boundary is clamped so the
//! range never inverts: a new start past the end lands on the end, a new
//! end before the start lands on the start. Group siblings are never
//! touched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Change;
use crate::config::EngineConfig;
use crate::dates::{add_days, day_difference};
use crate::error::EngineError;
use crate::models::{ItemId, Timeline};

/// Which end of an item a resize drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// The first day.
    Start,
    /// The last day.
    End,
}

/// Moves an item (and its group, if any) so the item starts on `new_start`.
///
/// # Errors
/// [`EngineError::ItemNotFound`] if `id` is not in the timeline.
pub fn move_item(
    timeline: &Timeline,
    id: ItemId,
    new_start: NaiveDate,
    config: &EngineConfig,
) -> Result<Change, EngineError> {
    let item = timeline.require_item(id)?;
    let delta = day_difference(new_start, item.start);
    if delta == 0 {
        return Ok(Change::unchanged(timeline));
    }

    let (members, mode) = match timeline.group_of(id) {
        Some(group) => (group.task_ids.clone(), config.group_move_duration),
        None => (vec![id], config.move_duration),
    };

    let mut next = timeline.clone();
    for member in &members {
        let Some(moved) = next.item_mut(*member) else {
            continue;
        };
        let start = add_days(moved.start, delta);
        moved.end = mode.preserve_end(moved.start, moved.end, start, &config.calendar);
        moved.start = start;
    }

    debug!(item = id, delta, members = ?members, ?mode, "moved item");
    Ok(Change::new(next, members))
}

/// Drags one boundary of an item to `date`, clamping instead of inverting.
///
/// # Errors
/// [`EngineError::ItemNotFound`] if `id` is not in the timeline.
pub fn resize_item(
    timeline: &Timeline,
    id: ItemId,
    side: Boundary,
    date: NaiveDate,
) -> Result<Change, EngineError> {
    let item = timeline.require_item(id)?;
    let (start, end) = match side {
        Boundary::Start => (date.min(item.end), item.end),
        Boundary::End => (item.start, date.max(item.start)),
    };
    if start == item.start && end == item.end {
        return Ok(Change::unchanged(timeline));
    }
    if (side == Boundary::Start && date > item.end) || (side == Boundary::End && date < item.start)
    {
        debug!(item = id, ?side, %date, "resize clamped to keep start <= end");
    }

    let mut next = timeline.clone();
    if let Some(resized) = next.item_mut(id) {
        resized.start = start;
        resized.end = end;
    }
    debug!(item = id, ?side, %start, %end, "resized item");
    Ok(Change::new(next, vec![id]))
}

/// Shifts the listed items by `delta` days, keeping their calendar length.
pub(crate) fn shift_items(timeline: &mut Timeline, ids: &[ItemId], delta: i64) {
    for id in ids {
        if let Some(item) = timeline.item_mut(*id) {
            item.start = add_days(item.start, delta);
            item.end = add_days(item.end, delta);
        }
    }
}
