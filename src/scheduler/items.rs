//! Item lifecycle: create, edit, delete, bulk replace.
//!
//! Deletion cascades: predecessor references to a deleted item are
//! stripped, memberships are dropped and groups left with a single member
//! are dissolved. Bulk replacement is the import path; it accepts records
//! from outside the engine and repairs what it can instead of rejecting the
//! whole batch.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::normalize::normalize_in_place;
use super::Change;
use crate::error::EngineError;
use crate::models::{Group, Item, ItemId, ItemPayload, Timeline};
use crate::validation::{detect_predecessor_cycle, would_create_cycle};

/// Fields of an item before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    /// Display label; trimmed, must not be empty.
    pub name: String,
    /// First day.
    pub start: NaiveDate,
    /// Last day. Swapped with `start` if earlier.
    pub end: NaiveDate,
    /// Optional predecessor. May dangle.
    #[serde(default)]
    pub predecessor_id: Option<ItemId>,
    /// Caller-owned fields.
    #[serde(default)]
    pub payload: ItemPayload,
}

impl NewItem {
    /// Creates the fields of an item without predecessor or payload.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            predecessor_id: None,
            payload: ItemPayload::default(),
        }
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
}

fn clean_name(name: &str) -> Result<String, EngineError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Adds an item under a freshly allocated id.
///
/// # Errors
/// [`EngineError::EmptyName`] if the name is blank.
pub fn create_item(timeline: &Timeline, new_item: NewItem) -> Result<Change, EngineError> {
    let name = clean_name(&new_item.name)?;
    let mut next = timeline.clone();
    let id = next.allocate_item_id();
    let mut item = Item::new(id, name, new_item.start, new_item.end).with_payload(new_item.payload);
    item.predecessor_id = new_item.predecessor_id;
    next.items.push(item);

    debug!(item = id, "created item");
    let mut change = Change::new(next, vec![id]);
    change.created_item = Some(id);
    Ok(change)
}

/// Renames an item.
///
/// # Errors
/// - [`EngineError::ItemNotFound`] for an unknown id
/// - [`EngineError::EmptyName`] if the name is blank
pub fn rename_item(timeline: &Timeline, id: ItemId, name: &str) -> Result<Change, EngineError> {
    timeline.require_item(id)?;
    let name = clean_name(name)?;
    let mut next = timeline.clone();
    if let Some(item) = next.item_mut(id) {
        item.name = name;
    }
    Ok(Change::new(next, vec![id]))
}

/// Replaces an item's payload.
///
/// # Errors
/// [`EngineError::ItemNotFound`] for an unknown id.
pub fn update_payload(
    timeline: &Timeline,
    id: ItemId,
    payload: ItemPayload,
) -> Result<Change, EngineError> {
    timeline.require_item(id)?;
    let mut next = timeline.clone();
    if let Some(item) = next.item_mut(id) {
        item.payload = payload;
    }
    Ok(Change::new(next, vec![id]))
}

/// Sets or clears an item's predecessor.
///
/// Dangling targets are accepted; a link that would make the item its own
/// (transitive) predecessor is not.
///
/// # Errors
/// - [`EngineError::ItemNotFound`] for an unknown `id`
/// - [`EngineError::CyclicPredecessor`] for a self-link or loop
pub fn set_predecessor(
    timeline: &Timeline,
    id: ItemId,
    predecessor_id: Option<ItemId>,
) -> Result<Change, EngineError> {
    timeline.require_item(id)?;
    if let Some(predecessor) = predecessor_id {
        if would_create_cycle(&timeline.items, id, predecessor) {
            return Err(EngineError::CyclicPredecessor {
                item: id,
                predecessor,
            });
        }
    }
    let mut next = timeline.clone();
    if let Some(item) = next.item_mut(id) {
        item.predecessor_id = predecessor_id;
    }
    Ok(Change::new(next, vec![id]))
}

/// Deletes items with cascade.
///
/// Repeated ids are ignored. Id counters are not rolled back.
///
/// # Errors
/// [`EngineError::ItemNotFound`] if any id is unknown; nothing is deleted.
pub fn delete_items(timeline: &Timeline, ids: &[ItemId]) -> Result<Change, EngineError> {
    for id in ids {
        timeline.require_item(*id)?;
    }
    let doomed: HashSet<ItemId> = ids.iter().copied().collect();

    let mut next = timeline.clone();
    next.items.retain(|item| !doomed.contains(&item.id));

    let mut affected: Vec<ItemId> = Vec::new();
    let mut seen = HashSet::new();
    for id in ids {
        if seen.insert(*id) {
            affected.push(*id);
        }
    }
    for item in &mut next.items {
        if item.predecessor_id.is_some_and(|p| doomed.contains(&p)) {
            item.predecessor_id = None;
            affected.push(item.id);
        }
    }

    let report = normalize_in_place(&mut next);
    for id in report.released.into_iter().chain(report.linked) {
        if !affected.contains(&id) {
            affected.push(id);
        }
    }

    debug!(deleted = ?ids, affected = affected.len(), "deleted items");
    let mut change = Change::new(next, affected);
    change.dissolved_groups = report.dissolved;
    Ok(change)
}

/// Replaces the whole collection with an imported batch.
///
/// The batch is repaired rather than rejected where possible:
/// - bounds are ordered and names trimmed
/// - predecessor ids that are not in the batch are dropped
/// - a repeated group id keeps its first record
/// - an item pointing at a batch group that does not list it is appended
///   to that group, unless another group already lists it
/// - the normalize pipeline then resolves the remaining membership issues
///
/// Id counters never go below those of `previous`.
///
/// # Errors
/// - [`EngineError::DuplicateItemId`] if two items share an id
/// - [`EngineError::EmptyName`] if an item name is blank
/// - [`EngineError::CyclicPredecessor`] if the predecessor links loop
pub fn replace_all(
    previous: &Timeline,
    items: Vec<Item>,
    groups: Vec<Group>,
) -> Result<Change, EngineError> {
    let mut ids = HashSet::new();
    let mut cleaned = Vec::with_capacity(items.len());
    for item in items {
        if !ids.insert(item.id) {
            return Err(EngineError::DuplicateItemId(item.id));
        }
        let name = clean_name(&item.name)?;
        let mut item = item.with_dates(item.start, item.end);
        item.name = name;
        cleaned.push(item);
    }
    for item in &mut cleaned {
        if item.predecessor_id.is_some_and(|p| !ids.contains(&p)) {
            item.predecessor_id = None;
        }
    }
    if let Some((item, predecessor)) = detect_predecessor_cycle(&cleaned) {
        return Err(EngineError::CyclicPredecessor { item, predecessor });
    }

    let mut group_ids = HashSet::new();
    let mut groups: Vec<Group> = groups
        .into_iter()
        .filter(|g| group_ids.insert(g.id.clone()))
        .collect();
    adopt_claimed_members(&cleaned, &mut groups);

    let mut next = Timeline::from_parts(cleaned, groups);
    next.inherit_counters(previous);
    let report = normalize_in_place(&mut next);

    info!(
        items = next.item_count(),
        groups = next.group_count(),
        dissolved = report.dissolved.len(),
        "replaced collection"
    );
    let affected = next.items.iter().map(|i| i.id).collect();
    let mut change = Change::new(next, affected);
    change.dissolved_groups = report.dissolved;
    Ok(change)
}

/// Appends items to the group they name when no group lists them yet.
fn adopt_claimed_members(items: &[Item], groups: &mut [Group]) {
    let mut listed: HashSet<ItemId> = groups
        .iter()
        .flat_map(|g| g.task_ids.iter().copied())
        .collect();
    for item in items {
        let Some(claimed) = item.group_id.as_deref() else {
            continue;
        };
        if listed.contains(&item.id) {
            continue;
        }
        if let Some(group) = groups.iter_mut().find(|g| g.id == claimed) {
            group.task_ids.push(item.id);
            listed.insert(item.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_timeline;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn three() -> Timeline {
        let mut t = Timeline::new();
        for (name, start, end) in [("A", 4, 6), ("B", 7, 8), ("C", 9, 12)] {
            t = create_item(&t, NewItem::new(name, d(start), d(end)))
                .unwrap()
                .timeline;
        }
        t
    }

    #[test]
    fn test_create_item_allocates_ids() {
        let t = three();
        let ids: Vec<ItemId> = t.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let change = create_item(&t, NewItem::new("  D  ", d(20), d(18))).unwrap();
        assert_eq!(change.created_item, Some(4));
        let item = change.timeline.item(4).unwrap();
        assert_eq!(item.name, "D");
        assert_eq!((item.start, item.end), (d(18), d(20)));
    }

    #[test]
    fn test_create_item_rejects_blank_name() {
        let err = create_item(&three(), NewItem::new("   ", d(1), d(1))).unwrap_err();
        assert_eq!(err, EngineError::EmptyName);
    }

    #[test]
    fn test_rename_and_payload() {
        let t = three();
        let t = rename_item(&t, 2, "Inspection").unwrap().timeline;
        assert_eq!(t.item(2).unwrap().name, "Inspection");
        assert_eq!(rename_item(&t, 2, "").unwrap_err(), EngineError::EmptyName);

        let payload = ItemPayload {
            progress: 55,
            notes: Some("bring ladder".into()),
            ..ItemPayload::default()
        };
        let t = update_payload(&t, 2, payload.clone()).unwrap().timeline;
        assert_eq!(t.item(2).unwrap().payload, payload);
        assert_eq!(
            update_payload(&t, 9, payload).unwrap_err(),
            EngineError::ItemNotFound(9)
        );
    }

    #[test]
    fn test_set_predecessor_rejects_loops() {
        let t = set_predecessor(&three(), 2, Some(1)).unwrap().timeline;
        let t = set_predecessor(&t, 3, Some(2)).unwrap().timeline;
        assert_eq!(
            set_predecessor(&t, 1, Some(3)).unwrap_err(),
            EngineError::CyclicPredecessor {
                item: 1,
                predecessor: 3
            }
        );
        assert_eq!(
            set_predecessor(&t, 1, Some(1)).unwrap_err(),
            EngineError::CyclicPredecessor {
                item: 1,
                predecessor: 1
            }
        );
        // dangling and clearing are fine
        let t = set_predecessor(&t, 1, Some(99)).unwrap().timeline;
        assert_eq!(t.item(1).unwrap().predecessor_id, Some(99));
        let t = set_predecessor(&t, 3, None).unwrap().timeline;
        assert_eq!(t.item(3).unwrap().predecessor_id, None);
    }

    #[test]
    fn test_delete_cascades() {
        let t = set_predecessor(&three(), 3, Some(2)).unwrap().timeline;
        let t = super::super::create_group(&t, &[1, 2], None, None)
            .unwrap()
            .timeline;

        let change = delete_items(&t, &[2]).unwrap();
        let next = &change.timeline;
        assert!(next.item(2).is_none());
        assert_eq!(next.item(3).unwrap().predecessor_id, None);
        assert!(next.groups.is_empty());
        assert_eq!(next.item(1).unwrap().group_id, None);
        assert_eq!(change.dissolved_groups, vec!["g1".to_string()]);
        assert_eq!(change.affected, vec![2, 3, 1]);
        assert!(validate_timeline(next).is_ok());
    }

    #[test]
    fn test_delete_unknown_id_rejected() {
        let t = three();
        assert_eq!(
            delete_items(&t, &[1, 42]).unwrap_err(),
            EngineError::ItemNotFound(42)
        );
    }

    #[test]
    fn test_ids_never_reused_after_delete() {
        let t = delete_items(&three(), &[3]).unwrap().timeline;
        let change = create_item(&t, NewItem::new("D", d(1), d(1))).unwrap();
        assert_eq!(change.created_item, Some(4));
    }

    #[test]
    fn test_replace_all_repairs_batch() {
        let mut a = Item::new(10, " A ", d(5), d(2)).with_predecessor(77);
        a.group_id = Some("g4".into());
        let mut b = Item::new(11, "B", d(6), d(7)).with_predecessor(10);
        b.group_id = Some("g4".into());
        let c = Item::new(12, "C", d(8), d(9));
        let groups = vec![
            Group::new("g4", vec![10]),
            Group::new("g4", vec![12, 11]),
            Group::new("g5", vec![12, 99]),
        ];

        let change = replace_all(&Timeline::new(), vec![a, b, c], groups).unwrap();
        let t = &change.timeline;

        let a = t.item(10).unwrap();
        assert_eq!(a.name, "A");
        assert_eq!((a.start, a.end), (d(2), d(5)));
        assert_eq!(a.predecessor_id, None);
        assert_eq!(t.item(11).unwrap().predecessor_id, Some(10));
        // first g4 wins and adopts item 11; g5 shrinks to one member
        assert_eq!(t.require_group("g4").unwrap().task_ids, vec![10, 11]);
        assert!(t.group("g5").is_none());
        assert_eq!(change.dissolved_groups, vec!["g5".to_string()]);
        assert!(validate_timeline(t).is_ok());
    }

    #[test]
    fn test_replace_all_keeps_counters_moving() {
        let previous = three();
        let change = replace_all(&previous, vec![Item::on_day(1, "only", d(1))], vec![]).unwrap();
        let next = create_item(&change.timeline, NewItem::new("new", d(2), d(2))).unwrap();
        assert_eq!(next.created_item, Some(4));
    }

    #[test]
    fn test_replace_all_rejects_predecessor_loop() {
        let items = vec![
            Item::on_day(1, "a", d(1)).with_predecessor(3),
            Item::on_day(2, "b", d(2)).with_predecessor(1),
            Item::on_day(3, "c", d(3)).with_predecessor(2),
        ];
        assert_eq!(
            replace_all(&Timeline::new(), items, vec![]).unwrap_err(),
            EngineError::CyclicPredecessor {
                item: 1,
                predecessor: 3
            }
        );
    }

    #[test]
    fn test_replace_all_loop_through_dropped_link_is_fine() {
        // 2 → 40 is dropped (40 is not in the batch), so no loop remains
        let items = vec![
            Item::on_day(1, "a", d(1)).with_predecessor(2),
            Item::on_day(2, "b", d(2)).with_predecessor(40),
        ];
        let change = replace_all(&Timeline::new(), items, vec![]).unwrap();
        assert_eq!(change.timeline.item(1).unwrap().predecessor_id, Some(2));
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let items = vec![Item::on_day(1, "a", d(1)), Item::on_day(1, "b", d(2))];
        assert_eq!(
            replace_all(&Timeline::new(), items, vec![]).unwrap_err(),
            EngineError::DuplicateItemId(1)
        );
    }
}
