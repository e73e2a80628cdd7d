//! Group coherence: create, ungroup, interval edit, reorder.
//!
//! Groups model literal sequences (hand-offs between teams, procedure
//! steps) where relative order and spacing matter more than absolute
//! dates. Co-moving the whole group lives in
//! [`move_item`](super::move_item); this module holds the operations that
//! change membership or spacing.
//!
//! # Interval edit
//! `set_interval(prev, shift, gap)` places `shift` at `prev.end + gap` and
//! applies the same delta to every other member starting on or after
//! `shift`'s original start. Everything downstream keeps its length and
//! its gaps; everything upstream stays put.
//!
//! # Reorder
//! Re-linearizes the group: the first item keeps its dates, each next item
//! starts the day after the previous one ends and keeps its own length.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::normalize::normalize_in_place;
use super::reschedule::shift_items;
use super::Change;
use crate::dates::{add_days, day_difference};
use crate::error::EngineError;
use crate::models::{Group, GroupId, Item, ItemId, Timeline};

/// Groups the given items, in the given order.
///
/// Repeated ids are ignored (first occurrence keeps its position).
///
/// # Errors
/// - [`EngineError::TooFewGroupMembers`] with fewer than two distinct ids
/// - [`EngineError::ItemNotFound`] for an unknown id
/// - [`EngineError::AlreadyGrouped`] if any candidate is in a group
pub fn create_group(
    timeline: &Timeline,
    item_ids: &[ItemId],
    name: Option<String>,
    color: Option<String>,
) -> Result<Change, EngineError> {
    let mut seen = HashSet::new();
    let members: Vec<ItemId> = item_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
    if members.len() < Group::MIN_MEMBERS {
        return Err(EngineError::TooFewGroupMembers {
            count: members.len(),
        });
    }
    for id in &members {
        let item = timeline.require_item(*id)?;
        if let Some(group) = &item.group_id {
            return Err(EngineError::AlreadyGrouped {
                item: *id,
                group: group.clone(),
            });
        }
    }

    let mut next = timeline.clone();
    let group_id = next.allocate_group_id();
    next.groups.push(Group {
        id: group_id.clone(),
        name,
        task_ids: members.clone(),
        color,
    });
    for id in &members {
        if let Some(item) = next.item_mut(*id) {
            item.group_id = Some(group_id.clone());
        }
    }

    debug!(group = %group_id, members = ?members, "created group");
    let mut change = Change::new(next, members);
    change.created_group = Some(group_id);
    Ok(change)
}

/// Removes an item from its group, dissolving the group if it drops below
/// two members.
///
/// # Errors
/// - [`EngineError::ItemNotFound`] for an unknown id
/// - [`EngineError::NotGrouped`] if the item has no group
pub fn ungroup_item(timeline: &Timeline, id: ItemId) -> Result<Change, EngineError> {
    timeline.require_item(id)?;
    let group_id = timeline
        .group_of(id)
        .map(|g| g.id.clone())
        .ok_or(EngineError::NotGrouped(id))?;

    let mut next = timeline.clone();
    if let Some(group) = next.group_mut(&group_id) {
        group.task_ids.retain(|member| *member != id);
    }
    if let Some(item) = next.item_mut(id) {
        item.group_id = None;
    }
    let report = normalize_in_place(&mut next);

    debug!(item = id, group = %group_id, "ungrouped item");
    let mut affected = vec![id];
    affected.extend(report.released.iter().copied().filter(|r| *r != id));
    let mut change = Change::new(next, affected);
    change.dissolved_groups = report.dissolved;
    Ok(change)
}

/// Sets the gap between `previous_id`'s end and `shift_id`'s start to
/// `gap_days`, cascading the shift downstream.
///
/// # Errors
/// - [`EngineError::GroupNotFound`] for an unknown group
/// - [`EngineError::InvalidInterval`] if both ids are the same
/// - [`EngineError::NotGroupMember`] if either item is outside the group
pub fn set_interval(
    timeline: &Timeline,
    group_id: &str,
    previous_id: ItemId,
    shift_id: ItemId,
    gap_days: i64,
) -> Result<Change, EngineError> {
    let group = timeline.require_group(group_id)?;
    if previous_id == shift_id {
        return Err(EngineError::InvalidInterval {
            group: group.id.clone(),
        });
    }
    for id in [previous_id, shift_id] {
        if !group.contains(id) {
            return Err(EngineError::NotGroupMember {
                item: id,
                group: group.id.clone(),
            });
        }
    }
    let previous = timeline.require_item(previous_id)?;
    let shifted = timeline.require_item(shift_id)?;

    let new_start = add_days(previous.end, gap_days);
    let delta = day_difference(new_start, shifted.start);
    if delta == 0 {
        return Ok(Change::unchanged(timeline));
    }

    let downstream = downstream_of(&timeline.members(group), previous_id, shifted.start);
    let mut next = timeline.clone();
    shift_items(&mut next, &downstream, delta);

    debug!(group = %group_id, previous = previous_id, shifted = shift_id, gap_days, delta,
        cascade = ?downstream, "set group interval");
    Ok(Change::new(next, downstream))
}

/// Members (other than the anchor) starting on or after `pivot`, ascending
/// by start, ties in sequence order.
fn downstream_of(members: &[&Item], anchor: ItemId, pivot: NaiveDate) -> Vec<ItemId> {
    let mut downstream: Vec<&Item> = members
        .iter()
        .copied()
        .filter(|m| m.id != anchor && m.start >= pivot)
        .collect();
    // stable: equal starts keep sequence order
    downstream.sort_by_key(|m| m.start);
    downstream.into_iter().map(|m| m.id).collect()
}

/// Re-sequences a group back to back in `new_order`.
///
/// # Errors
/// - [`EngineError::GroupNotFound`] for an unknown group
/// - [`EngineError::InvalidGroupOrder`] unless `new_order` lists every
///   member exactly once
pub fn reorder_group(
    timeline: &Timeline,
    group_id: &str,
    new_order: &[ItemId],
) -> Result<Change, EngineError> {
    let group = timeline.require_group(group_id)?;
    if !is_permutation(&group.task_ids, new_order) {
        return Err(EngineError::InvalidGroupOrder {
            group: group.id.clone(),
        });
    }

    let mut next = timeline.clone();
    let mut previous_end: Option<NaiveDate> = None;
    for id in new_order {
        let item = next.item_mut(*id).ok_or(EngineError::ItemNotFound(*id))?;
        if let Some(end) = previous_end {
            let length = item.calendar_days();
            item.start = add_days(end, 1);
            item.end = add_days(item.start, length);
        }
        previous_end = Some(item.end);
    }
    let owned_id: GroupId = group.id.clone();
    if let Some(group) = next.group_mut(&owned_id) {
        group.task_ids = new_order.to_vec();
    }

    debug!(group = %owned_id, order = ?new_order, "reordered group");
    Ok(Change::new(next, new_order.to_vec()))
}

fn is_permutation(members: &[ItemId], order: &[ItemId]) -> bool {
    if members.len() != order.len() {
        return false;
    }
    let wanted: HashSet<ItemId> = members.iter().copied().collect();
    let given: HashSet<ItemId> = order.iter().copied().collect();
    given.len() == order.len() && wanted == given
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_timeline;

    fn day(n: i64) -> NaiveDate {
        add_days(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), n)
    }

    fn loose_items() -> Timeline {
        Timeline::from_parts(
            vec![
                Item::new(1, "A", day(0), day(2)),
                Item::new(2, "B", day(4), day(5)),
                Item::new(3, "C", day(8), day(10)),
                Item::new(4, "D", day(1), day(1)),
            ],
            vec![],
        )
    }

    fn chain() -> Timeline {
        create_group(&loose_items(), &[1, 2, 3], Some("chain".into()), None)
            .unwrap()
            .timeline
    }

    fn dates(t: &Timeline, id: ItemId) -> (NaiveDate, NaiveDate) {
        let item = t.item(id).unwrap();
        (item.start, item.end)
    }

    #[test]
    fn test_create_group() {
        let change = create_group(&loose_items(), &[1, 2, 1], None, Some("#0af".into())).unwrap();
        let group_id = change.created_group.clone().unwrap();
        assert_eq!(group_id, "g1");
        let group = change.timeline.require_group(&group_id).unwrap();
        assert_eq!(group.task_ids, vec![1, 2]);
        assert_eq!(group.color.as_deref(), Some("#0af"));
        assert_eq!(change.timeline.item(1).unwrap().group_id.as_deref(), Some("g1"));
        assert!(validate_timeline(&change.timeline).is_ok());
    }

    #[test]
    fn test_create_group_needs_two() {
        let err = create_group(&loose_items(), &[1, 1], None, None).unwrap_err();
        assert_eq!(err, EngineError::TooFewGroupMembers { count: 1 });
    }

    #[test]
    fn test_create_group_rejects_grouped_candidate() {
        let err = create_group(&chain(), &[3, 4], None, None).unwrap_err();
        assert_eq!(
            err,
            EngineError::AlreadyGrouped {
                item: 3,
                group: "g1".into()
            }
        );
    }

    #[test]
    fn test_create_group_unknown_item() {
        let err = create_group(&loose_items(), &[1, 99], None, None).unwrap_err();
        assert_eq!(err, EngineError::ItemNotFound(99));
    }

    #[test]
    fn test_ungroup_keeps_viable_group() {
        let change = ungroup_item(&chain(), 2).unwrap();
        let t = &change.timeline;
        assert_eq!(t.require_group("g1").unwrap().task_ids, vec![1, 3]);
        assert_eq!(t.item(2).unwrap().group_id, None);
        assert!(change.dissolved_groups.is_empty());
        assert!(validate_timeline(t).is_ok());
    }

    #[test]
    fn test_ungroup_dissolves_pair() {
        let pair = create_group(&loose_items(), &[1, 2], None, None).unwrap().timeline;
        let change = ungroup_item(&pair, 1).unwrap();
        assert!(change.timeline.groups.is_empty());
        assert_eq!(change.timeline.item(2).unwrap().group_id, None);
        assert_eq!(change.dissolved_groups, vec!["g1".to_string()]);
        assert_eq!(change.affected, vec![1, 2]);
    }

    #[test]
    fn test_ungroup_ungrouped_item() {
        assert_eq!(ungroup_item(&chain(), 4).unwrap_err(), EngineError::NotGrouped(4));
    }

    #[test]
    fn test_set_interval_cascades_downstream() {
        // A(0-2) B(4-5) C(8-10); widen the A→B gap to 3 days
        let change = set_interval(&chain(), "g1", 1, 2, 3).unwrap();
        let t = &change.timeline;
        assert_eq!(dates(t, 1), (day(0), day(2)));
        assert_eq!(dates(t, 2), (day(5), day(6)));
        assert_eq!(dates(t, 3), (day(9), day(11)));
        assert_eq!(change.affected, vec![2, 3]);
    }

    #[test]
    fn test_set_interval_leaves_upstream() {
        // tighten B→C to 1 day: C moves to 6; A and B stay
        let change = set_interval(&chain(), "g1", 2, 3, 1).unwrap();
        let t = &change.timeline;
        assert_eq!(dates(t, 1), (day(0), day(2)));
        assert_eq!(dates(t, 2), (day(4), day(5)));
        assert_eq!(dates(t, 3), (day(6), day(8)));
    }

    #[test]
    fn test_set_interval_negative_gap() {
        let change = set_interval(&chain(), "g1", 1, 2, -1).unwrap();
        assert_eq!(dates(&change.timeline, 2), (day(1), day(2)));
    }

    #[test]
    fn test_set_interval_noop() {
        // B already starts 2 days after A ends
        let t = chain();
        let change = set_interval(&t, "g1", 1, 2, 2).unwrap();
        assert_eq!(change.timeline, t);
    }

    #[test]
    fn test_set_interval_errors() {
        let t = chain();
        assert_eq!(
            set_interval(&t, "g1", 1, 4, 1).unwrap_err(),
            EngineError::NotGroupMember {
                item: 4,
                group: "g1".into()
            }
        );
        assert_eq!(
            set_interval(&t, "g1", 2, 2, 1).unwrap_err(),
            EngineError::InvalidInterval { group: "g1".into() }
        );
        assert_eq!(
            set_interval(&t, "g7", 1, 2, 1).unwrap_err(),
            EngineError::GroupNotFound("g7".into())
        );
    }

    #[test]
    fn test_reorder_relinearizes() {
        // new order C, A, B: C keeps 8-10, A(3 days) 11-13, B(2 days) 14-15
        let change = reorder_group(&chain(), "g1", &[3, 1, 2]).unwrap();
        let t = &change.timeline;
        assert_eq!(dates(t, 3), (day(8), day(10)));
        assert_eq!(dates(t, 1), (day(11), day(13)));
        assert_eq!(dates(t, 2), (day(14), day(15)));
        assert_eq!(t.require_group("g1").unwrap().task_ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_reorder_same_order_closes_gaps() {
        let change = reorder_group(&chain(), "g1", &[1, 2, 3]).unwrap();
        let t = &change.timeline;
        assert_eq!(dates(t, 1), (day(0), day(2)));
        assert_eq!(dates(t, 2), (day(3), day(4)));
        assert_eq!(dates(t, 3), (day(5), day(7)));
    }

    #[test]
    fn test_reorder_rejects_non_permutation() {
        let t = chain();
        for bad in [&[1, 2][..], &[1, 2, 2], &[1, 2, 4], &[1, 2, 3, 4]] {
            assert_eq!(
                reorder_group(&t, "g1", bad).unwrap_err(),
                EngineError::InvalidGroupOrder { group: "g1".into() }
            );
        }
    }
}
