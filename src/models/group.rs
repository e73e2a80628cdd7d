//! Group model.
//!
//! A group is an ordered set of items that move together. Membership order
//! is the temporal sequence used by interval edits and reordering.

use serde::{Deserialize, Serialize};

use super::ItemId;

/// Group identifier (`g<n>` tokens allocated by the timeline).
pub type GroupId = String;

/// An ordered set of items that move together.
///
/// # Invariants
/// - At least [`Group::MIN_MEMBERS`] members once any membership-reducing
///   operation has run; smaller groups are dissolved.
/// - Each member's `Item::group_id` names this group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Optional display label.
    #[serde(default)]
    pub name: Option<String>,
    /// Member item ids, in sequence order.
    pub task_ids: Vec<ItemId>,
    /// Opaque display color.
    #[serde(default)]
    pub color: Option<String>,
}

impl Group {
    /// Smallest viable membership.
    pub const MIN_MEMBERS: usize = 2;

    /// Creates an unnamed group.
    pub fn new(id: impl Into<GroupId>, task_ids: Vec<ItemId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            task_ids,
            color: None,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Whether `item_id` is a member.
    #[inline]
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.task_ids.contains(&item_id)
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    /// Whether the group has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    /// Whether the group is large enough to exist.
    #[inline]
    pub fn is_viable(&self) -> bool {
        self.len() >= Self::MIN_MEMBERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_builder() {
        let g = Group::new("g1", vec![4, 2, 9])
            .with_name("Hand-off")
            .with_color("#ffaa00");
        assert_eq!(g.id, "g1");
        assert_eq!(g.name.as_deref(), Some("Hand-off"));
        assert_eq!(g.color.as_deref(), Some("#ffaa00"));
        assert_eq!(g.len(), 3);
        assert!(g.contains(9));
        assert!(!g.contains(5));
        assert_eq!(g.task_ids, vec![4, 2, 9]);
    }

    #[test]
    fn test_group_viability() {
        assert!(Group::new("g1", vec![1, 2]).is_viable());
        assert!(!Group::new("g1", vec![1]).is_viable());
        assert!(Group::new("g1", vec![]).is_empty());
    }
}
