//! Commands accepted by the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Group, GroupId, Item, ItemId, ItemPayload};
use crate::scheduler::{Boundary, NewItem};

/// One atomic request against a timeline.
///
/// Serialized with a `command` tag so hosts can queue or log requests:
///
/// ```
/// use u_timeline::engine::Command;
///
/// let cmd: Command =
///     serde_json::from_str(r#"{"command":"move_item","id":3,"new_start":"2024-03-11"}"#).unwrap();
/// assert_eq!(cmd.kind(), "move_item");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Adds an item under a fresh id.
    CreateItem(NewItem),
    /// Changes an item's name.
    RenameItem { id: ItemId, name: String },
    /// Sets or clears an item's predecessor.
    SetPredecessor {
        id: ItemId,
        #[serde(default)]
        predecessor_id: Option<ItemId>,
    },
    /// Replaces an item's payload.
    UpdatePayload { id: ItemId, payload: ItemPayload },
    /// Drags an item (and its group) to a new start.
    MoveItem { id: ItemId, new_start: NaiveDate },
    /// Drags one boundary of an item.
    ResizeItem {
        id: ItemId,
        side: Boundary,
        date: NaiveDate,
    },
    /// Groups two or more ungrouped items.
    CreateGroup {
        item_ids: Vec<ItemId>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
    /// Removes an item from its group.
    UngroupItem { id: ItemId },
    /// Deletes items with cascade.
    DeleteItems { ids: Vec<ItemId> },
    /// Sets the gap between two group members.
    SetInterval {
        group_id: GroupId,
        previous_id: ItemId,
        shift_id: ItemId,
        gap_days: i64,
    },
    /// Re-sequences a group back to back.
    ReorderGroup { group_id: GroupId, order: Vec<ItemId> },
    /// Replaces the collection with an imported batch.
    ReplaceAll {
        items: Vec<Item>,
        #[serde(default)]
        groups: Vec<Group>,
    },
}

impl Command {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateItem(_) => "create_item",
            Self::RenameItem { .. } => "rename_item",
            Self::SetPredecessor { .. } => "set_predecessor",
            Self::UpdatePayload { .. } => "update_payload",
            Self::MoveItem { .. } => "move_item",
            Self::ResizeItem { .. } => "resize_item",
            Self::CreateGroup { .. } => "create_group",
            Self::UngroupItem { .. } => "ungroup_item",
            Self::DeleteItems { .. } => "delete_items",
            Self::SetInterval { .. } => "set_interval",
            Self::ReorderGroup { .. } => "reorder_group",
            Self::ReplaceAll { .. } => "replace_all",
        }
    }

    /// Whether the command can change group membership.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CreateGroup { .. }
                | Self::UngroupItem { .. }
                | Self::DeleteItems { .. }
                | Self::ReplaceAll { .. }
        )
    }
}
