//! Warning (advisory) model.
//!
//! Warnings are derived output: recomputed from scratch after every
//! command, never stored, never blocking.

use serde::{Deserialize, Serialize};

use super::{Item, ItemId};

/// A non-blocking indicator that an item starts before its predecessor ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Warning {
    /// The item that starts too early.
    pub item_id: ItemId,
    /// The predecessor it overlaps.
    pub predecessor_id: ItemId,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// Creates a predecessor-overlap warning for `item` against `predecessor`.
    pub fn predecessor_overlap(item: &Item, predecessor: &Item) -> Self {
        Self {
            item_id: item.id,
            predecessor_id: predecessor.id,
            message: format!(
                "'{}' starts {} before predecessor '{}' ends {}",
                item.name, item.start, predecessor.name, predecessor.end
            ),
        }
    }
}
