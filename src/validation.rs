//! Structural validation for timelines.
//!
//! Checks the invariants every command must leave intact. Detects:
//! - Duplicate item or group IDs
//! - Empty item names
//! - Inverted date ranges
//! - Groups with fewer than two members
//! - Items claimed by more than one group
//! - `group_id` / `task_ids` links that disagree
//!
//! Predecessor cycles are not an invariant violation (warnings cover
//! ordering), but commands refuse to create one: [`would_create_cycle`]
//! checks a single new link, [`detect_predecessor_cycle`] a whole imported
//! batch.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::{Group, Item, ItemId, Timeline};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An item name is empty after trimming.
    EmptyName,
    /// An item ends before it starts.
    InvertedRange,
    /// A group has fewer than two members.
    UndersizedGroup,
    /// An item is listed by more than one group.
    MultipleGroups,
    /// An item's `group_id` and the group's `task_ids` disagree.
    BrokenGroupLink,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structural invariants of a timeline.
///
/// Checks:
/// 1. No duplicate item IDs
/// 2. No duplicate group IDs
/// 3. Every item name is non-empty after trim
/// 4. Every item has `start <= end`
/// 5. Every group has at least two members, all of which exist
/// 6. No item is listed by two groups
/// 7. `Item::group_id` and `Group::task_ids` agree in both directions
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_timeline(timeline: &Timeline) -> ValidationResult {
    let mut errors = Vec::new();

    let mut item_ids = HashSet::new();
    for item in &timeline.items {
        if !item_ids.insert(item.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate item ID: {}", item.id),
            ));
        }
        if item.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Item {} has an empty name", item.id),
            ));
        }
        if item.start > item.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedRange,
                format!("Item {} ends {} before it starts {}", item.id, item.end, item.start),
            ));
        }
    }

    let mut group_ids = HashSet::new();
    let mut owner: HashMap<ItemId, &str> = HashMap::new();
    for group in &timeline.groups {
        if !group_ids.insert(group.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group ID: {}", group.id),
            ));
        }
        check_group_members(group, &item_ids, &mut owner, &mut errors);
    }

    for item in &timeline.items {
        let listed_by = owner.get(&item.id).copied();
        if item.group_id.as_deref() != listed_by {
            errors.push(ValidationError::new(
                ValidationErrorKind::BrokenGroupLink,
                format!(
                    "Item {} points at group {:?} but is listed by {:?}",
                    item.id, item.group_id, listed_by
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_group_members<'a>(
    group: &'a Group,
    item_ids: &HashSet<ItemId>,
    owner: &mut HashMap<ItemId, &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let distinct: HashSet<ItemId> = group.task_ids.iter().copied().collect();
    if distinct.len() < Group::MIN_MEMBERS {
        errors.push(ValidationError::new(
            ValidationErrorKind::UndersizedGroup,
            format!("Group '{}' has {} member(s)", group.id, distinct.len()),
        ));
    }
    if distinct.len() != group.task_ids.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateId,
            format!("Group '{}' lists an item twice", group.id),
        ));
    }

    for id in &group.task_ids {
        if !item_ids.contains(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::BrokenGroupLink,
                format!("Group '{}' lists unknown item {}", group.id, id),
            ));
            continue;
        }
        if let Some(previous) = owner.insert(*id, group.id.as_str()) {
            if previous != group.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MultipleGroups,
                    format!(
                        "Item {} is listed by groups '{}' and '{}'",
                        id, previous, group.id
                    ),
                ));
            }
        }
    }
}

/// Finds a cycle in the predecessor graph using DFS.
///
/// Returns a link `(item, predecessor)` that closes a cycle, or `None`
/// when the graph is acyclic. Both ids lie on the cycle. Dangling
/// predecessor ids end a chain.
///
/// # Algorithm
/// Each item has at most one predecessor, so the graph is a functional
/// graph. DFS with a recursion-stack set finds a back edge if one exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
pub fn detect_predecessor_cycle(items: &[Item]) -> Option<(ItemId, ItemId)> {
    // predecessor → successors
    let mut successors: HashMap<ItemId, Vec<ItemId>> = HashMap::new();
    let known: HashSet<ItemId> = items.iter().map(|i| i.id).collect();
    for item in items {
        if let Some(pred) = item.predecessor_id.filter(|p| known.contains(p)) {
            successors.entry(pred).or_default().push(item.id);
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for item in items {
        if visited.contains(&item.id) {
            continue;
        }
        if let Some(link) = back_edge_dfs(item.id, &successors, &mut visited, &mut in_stack) {
            return Some(link);
        }
    }

    None
}

/// Whether setting `item`'s predecessor to `predecessor` would close a loop.
pub fn would_create_cycle(items: &[Item], item: ItemId, predecessor: ItemId) -> bool {
    if item == predecessor {
        return true;
    }
    let index: HashMap<ItemId, Option<ItemId>> =
        items.iter().map(|i| (i.id, i.predecessor_id)).collect();

    // Walk upstream from the new predecessor; reaching `item` closes a loop.
    let mut seen = HashSet::new();
    let mut cursor = Some(predecessor);
    while let Some(current) = cursor {
        if current == item {
            return true;
        }
        if !seen.insert(current) {
            return false;
        }
        cursor = index.get(&current).copied().flatten();
    }
    false
}

fn back_edge_dfs(
    node: ItemId,
    successors: &HashMap<ItemId, Vec<ItemId>>,
    visited: &mut HashSet<ItemId>,
    in_stack: &mut HashSet<ItemId>,
) -> Option<(ItemId, ItemId)> {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(next_items) = successors.get(&node) {
        for &next in next_items {
            // `next` follows `node`; reaching it again on the stack closes the loop
            if in_stack.contains(&next) {
                return Some((next, node));
            }
            if !visited.contains(&next) {
                if let Some(link) = back_edge_dfs(next, successors, visited, in_stack) {
                    return Some(link);
                }
            }
        }
    }

    in_stack.remove(&node);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn grouped(id: ItemId, group: &str) -> Item {
        let mut item = Item::new(id, format!("item {id}"), d(1), d(3));
        item.group_id = Some(group.to_string());
        item
    }

    fn sample_timeline() -> Timeline {
        Timeline::from_parts(
            vec![grouped(1, "g1"), grouped(2, "g1"), Item::new(3, "solo", d(4), d(6))],
            vec![Group::new("g1", vec![1, 2])],
        )
    }

    fn kinds(timeline: &Timeline) -> Vec<ValidationErrorKind> {
        validate_timeline(timeline)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_timeline() {
        assert!(validate_timeline(&sample_timeline()).is_ok());
        assert!(validate_timeline(&Timeline::new()).is_ok());
    }

    #[test]
    fn test_duplicate_item_id() {
        let mut t = sample_timeline();
        t.items.push(Item::new(3, "again", d(1), d(1)));
        assert!(kinds(&t).contains(&ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_name() {
        let mut t = sample_timeline();
        t.items[2].name = "   ".into();
        assert_eq!(kinds(&t), vec![ValidationErrorKind::EmptyName]);
    }

    #[test]
    fn test_inverted_range() {
        let mut t = sample_timeline();
        t.items[2].end = d(1);
        assert_eq!(kinds(&t), vec![ValidationErrorKind::InvertedRange]);
    }

    #[test]
    fn test_undersized_group() {
        let t = Timeline::from_parts(vec![grouped(1, "g1")], vec![Group::new("g1", vec![1])]);
        assert_eq!(kinds(&t), vec![ValidationErrorKind::UndersizedGroup]);
    }

    #[test]
    fn test_item_in_two_groups() {
        let mut t = sample_timeline();
        t.items.push(grouped(4, "g2"));
        t.groups.push(Group::new("g2", vec![4, 1]));
        let found = kinds(&t);
        assert!(found.contains(&ValidationErrorKind::MultipleGroups));
    }

    #[test]
    fn test_group_link_mismatch() {
        let mut t = sample_timeline();
        t.items[1].group_id = None;
        assert_eq!(kinds(&t), vec![ValidationErrorKind::BrokenGroupLink]);

        let mut t2 = sample_timeline();
        t2.items[2].group_id = Some("g1".into());
        assert_eq!(kinds(&t2), vec![ValidationErrorKind::BrokenGroupLink]);
    }

    #[test]
    fn test_group_lists_unknown_item() {
        let mut t = sample_timeline();
        t.groups[0].task_ids.push(42);
        assert!(kinds(&t).contains(&ValidationErrorKind::BrokenGroupLink));
    }

    #[test]
    fn test_multiple_errors() {
        let mut t = sample_timeline();
        t.items[2].name = String::new();
        t.items[2].end = d(1);
        assert!(validate_timeline(&t).unwrap_err().len() >= 2);
    }

    #[test]
    fn test_predecessor_cycle() {
        // 1 → 2 → 3 → 1
        let items = vec![
            Item::new(1, "a", d(1), d(2)).with_predecessor(3),
            Item::new(2, "b", d(1), d(2)).with_predecessor(1),
            Item::new(3, "c", d(1), d(2)).with_predecessor(2),
        ];
        assert_eq!(detect_predecessor_cycle(&items), Some((1, 3)));
    }

    #[test]
    fn test_cycle_reported_on_the_loop() {
        // 4 hangs off the 2 ⇄ 3 loop but is not part of it
        let items = vec![
            Item::new(4, "branch", d(1), d(2)).with_predecessor(2),
            Item::new(2, "b", d(1), d(2)).with_predecessor(3),
            Item::new(3, "c", d(1), d(2)).with_predecessor(2),
            Item::new(5, "free", d(1), d(2)),
        ];
        let (item, predecessor) = detect_predecessor_cycle(&items).unwrap();
        assert_eq!((item, predecessor), (2, 3));

        let lone = vec![Item::new(7, "self", d(1), d(2)).with_predecessor(7)];
        assert_eq!(detect_predecessor_cycle(&lone), Some((7, 7)));
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let items = vec![
            Item::new(1, "a", d(1), d(2)),
            Item::new(2, "b", d(1), d(2)).with_predecessor(1),
            Item::new(3, "c", d(1), d(2)).with_predecessor(2),
            Item::new(4, "d", d(1), d(2)).with_predecessor(99),
        ];
        assert_eq!(detect_predecessor_cycle(&items), None);
    }

    #[test]
    fn test_would_create_cycle() {
        let items = vec![
            Item::new(1, "a", d(1), d(2)),
            Item::new(2, "b", d(1), d(2)).with_predecessor(1),
            Item::new(3, "c", d(1), d(2)).with_predecessor(2),
        ];
        assert!(would_create_cycle(&items, 1, 3));
        assert!(would_create_cycle(&items, 2, 2));
        assert!(!would_create_cycle(&items, 3, 1));
        assert!(!would_create_cycle(&items, 1, 99));
    }
}
