//! Timeline (collection) model.
//!
//! A timeline is the canonical item/group collection for one project.
//! Engines receive `&Timeline` and return a new `Timeline`; nothing in the
//! crate mutates a timeline a caller still holds.

use serde::{Deserialize, Serialize};

use super::{DateWindow, Group, GroupId, Item, ItemId};
use crate::error::EngineError;

/// Items and groups of one project, plus id allocation state.
///
/// Deserializing re-derives the id counters from the records, so a
/// document saved without them (or with stale values) never hands out an
/// id that is already in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TimelineRecord")]
pub struct Timeline {
    /// Items in insertion order.
    pub items: Vec<Item>,
    /// Groups in creation order.
    pub groups: Vec<Group>,
    /// Next item id to hand out.
    next_item_id: ItemId,
    /// Next group sequence number (`g<n>`).
    next_group_seq: u64,
}

/// Serialized form of [`Timeline`]; the counters are optional.
#[derive(Deserialize)]
struct TimelineRecord {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    next_item_id: ItemId,
    #[serde(default)]
    next_group_seq: u64,
}

impl From<TimelineRecord> for Timeline {
    fn from(record: TimelineRecord) -> Self {
        let mut timeline = Self::from_parts(record.items, record.groups);
        timeline.next_item_id = timeline.next_item_id.max(record.next_item_id);
        timeline.next_group_seq = timeline.next_group_seq.max(record.next_group_seq);
        timeline
    }
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self {
            next_item_id: 1,
            next_group_seq: 1,
            ..Self::default()
        }
    }

    /// Builds a timeline from existing records without validating them.
    ///
    /// Id counters are advanced past every id present, so fresh ids never
    /// collide with the given ones. Use the engine's `ReplaceAll` command
    /// for untrusted input.
    pub fn from_parts(items: Vec<Item>, groups: Vec<Group>) -> Self {
        let mut timeline = Self {
            items,
            groups,
            next_item_id: 1,
            next_group_seq: 1,
        };
        timeline.advance_counters();
        timeline
    }

    /// Finds an item by id.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Finds an item by id, or reports it missing.
    pub fn require_item(&self, id: ItemId) -> Result<&Item, EngineError> {
        self.item(id).ok_or(EngineError::ItemNotFound(id))
    }

    /// Finds a group by id.
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Finds a group by id, or reports it missing.
    pub fn require_group(&self, id: &str) -> Result<&Group, EngineError> {
        self.group(id)
            .ok_or_else(|| EngineError::GroupNotFound(id.to_string()))
    }

    /// The group an item belongs to, if the link is consistent both ways.
    pub fn group_of(&self, item_id: ItemId) -> Option<&Group> {
        let group_id = self.item(item_id)?.group_id.as_deref()?;
        self.group(group_id).filter(|g| g.contains(item_id))
    }

    /// Members of a group in sequence order (missing ids skipped).
    pub fn members(&self, group: &Group) -> Vec<&Item> {
        group
            .task_ids
            .iter()
            .filter_map(|id| self.item(*id))
            .collect()
    }

    /// Smallest window covering every item, or `None` when empty.
    pub fn span(&self) -> Option<DateWindow> {
        let start = self.items.iter().map(|i| i.start).min()?;
        let end = self.items.iter().map(|i| i.end).max()?;
        Some(DateWindow::new(start, end))
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Whether the timeline holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next created item will receive.
    pub fn peek_next_item_id(&self) -> ItemId {
        self.next_item_id.max(1)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub(crate) fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub(crate) fn allocate_item_id(&mut self) -> ItemId {
        let id = self.peek_next_item_id();
        self.next_item_id = id + 1;
        id
    }

    pub(crate) fn allocate_group_id(&mut self) -> GroupId {
        let seq = self.next_group_seq.max(1);
        self.next_group_seq = seq + 1;
        format!("g{seq}")
    }

    /// Keeps whichever counters are further along, so ids handed out by
    /// `other` are never handed out again.
    pub(crate) fn inherit_counters(&mut self, other: &Timeline) {
        self.next_item_id = self.next_item_id.max(other.next_item_id);
        self.next_group_seq = self.next_group_seq.max(other.next_group_seq);
    }

    /// Moves the counters past every id in use. Counters never go backwards.
    pub(crate) fn advance_counters(&mut self) {
        if let Some(max_id) = self.items.iter().map(|i| i.id).max() {
            self.next_item_id = self.next_item_id.max(max_id + 1);
        }
        if let Some(max_seq) = self.groups.iter().filter_map(|g| group_seq(&g.id)).max() {
            self.next_group_seq = self.next_group_seq.max(max_seq + 1);
        }
    }
}

fn group_seq(id: &str) -> Option<u64> {
    id.strip_prefix('g')?.parse().ok()
}
