//! Predecessor conflict detection.
//!
//! An item conflicts with its predecessor when it starts strictly before
//! the predecessor ends. Starting on the predecessor's last day is allowed.
//! Items without a predecessor, or whose predecessor id does not resolve,
//! never conflict.
//!
//! # Complexity
//! O(n): one id index per run, one lookup per item.

use std::collections::HashMap;

use crate::models::{Item, ItemId, Warning};

/// Computes every predecessor-ordering warning, in collection order.
///
/// ```
/// use chrono::NaiveDate;
/// use u_timeline::conflict::detect_conflicts;
/// use u_timeline::models::Item;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
/// let items = vec![
///     Item::new(1, "Design", day(1), day(10)),
///     Item::new(2, "Build", day(8), day(12)).with_predecessor(1),
/// ];
/// let warnings = detect_conflicts(&items);
/// assert_eq!(warnings.len(), 1);
/// assert_eq!(warnings[0].item_id, 2);
/// ```
pub fn detect_conflicts(items: &[Item]) -> Vec<Warning> {
    let index: HashMap<ItemId, &Item> = items.iter().map(|i| (i.id, i)).collect();

    items
        .iter()
        .filter_map(|item| {
            let predecessor = index.get(&item.predecessor_id?)?;
            (item.start < predecessor.end).then(|| Warning::predecessor_overlap(item, predecessor))
        })
        .collect()
}
