//! Timeline transformations and summary metrics.
//!
//! Every function here takes `&Timeline` and returns a [`Change`] holding a
//! new timeline; the input is never mutated. Validation failures return an
//! [`EngineError`](crate::error::EngineError) before any copy is made.
//!
//! # Modules
//!
//! - **`reschedule`**: move (with group co-move) and resize
//! - **`grouping`**: create, ungroup, interval edit, reorder
//! - **`items`**: create, rename, payload, predecessor, delete, replace-all
//! - **`normalize`**: the cleanup pipeline run after structural changes
//! - **`summary`**: collection-level metrics
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

mod grouping;
mod items;
mod normalize;
mod reschedule;
mod summary;

pub use grouping::{create_group, reorder_group, set_interval, ungroup_item};
pub use items::{
    create_item, delete_items, rename_item, replace_all, set_predecessor, update_payload,
    NewItem,
};
pub use normalize::{normalize, NormalizeReport};
pub use reschedule::{move_item, resize_item, Boundary};
pub use summary::TimelineSummary;

pub(crate) use normalize::normalize_in_place;

use crate::models::{GroupId, ItemId, Timeline};

/// Result of one transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// The new collection.
    pub timeline: Timeline,
    /// Items whose record changed (dates, links or fields), in the order
    /// they were touched.
    pub affected: Vec<ItemId>,
    /// Id allocated by a create.
    pub created_item: Option<ItemId>,
    /// Id allocated by a group create.
    pub created_group: Option<GroupId>,
    /// Groups removed for dropping below two members.
    pub dissolved_groups: Vec<GroupId>,
}

impl Change {
    /// A change touching the given items.
    pub fn new(timeline: Timeline, affected: Vec<ItemId>) -> Self {
        Self {
            timeline,
            affected,
            created_item: None,
            created_group: None,
            dissolved_groups: Vec::new(),
        }
    }

    /// A change that leaves the collection as it was.
    pub fn unchanged(timeline: &Timeline) -> Self {
        Self::new(timeline.clone(), Vec::new())
    }
}
