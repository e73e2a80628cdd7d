//! Engine error type.
//!
//! Every command either succeeds with a new collection or fails with an
//! [`EngineError`] and leaves the caller's collection untouched. Silent
//! clamps (resize inversions) and cascading cleanups (group dissolution,
//! reference stripping) are not errors and never surface here.

use crate::models::{GroupId, ItemId};
use crate::validation::ValidationError;

/// Errors returned by engine commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The command referenced an item that is not in the collection.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The command referenced a group that is not in the collection.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// A group needs at least two distinct members.
    #[error("a group needs at least 2 items, got {count}")]
    TooFewGroupMembers { count: usize },

    /// A group candidate is already a member of another group.
    #[error("item {item} already belongs to group {group}")]
    AlreadyGrouped { item: ItemId, group: GroupId },

    /// Ungroup was requested for an item without a group.
    #[error("item {0} is not in a group")]
    NotGrouped(ItemId),

    /// A group operation named an item outside the group.
    #[error("item {item} is not a member of group {group}")]
    NotGroupMember { item: ItemId, group: GroupId },

    /// A reorder request was not a permutation of the group's members.
    #[error("new order for group {group} must list every member exactly once")]
    InvalidGroupOrder { group: GroupId },

    /// An interval edit named the same member as anchor and shifted item.
    #[error("interval in group {group} needs two different members")]
    InvalidInterval { group: GroupId },

    /// Two items in a replacement collection share an id.
    #[error("duplicate item id: {0}")]
    DuplicateItemId(ItemId),

    /// Item names must be non-empty after trimming.
    #[error("item name must not be empty")]
    EmptyName,

    /// Linking `item` to `predecessor` would close a predecessor loop.
    #[error("item {item} cannot follow {predecessor}: predecessor chain would loop")]
    CyclicPredecessor { item: ItemId, predecessor: ItemId },

    /// The collection broke a structural invariant after a command, either
    /// because the input was already malformed or because of an engine bug.
    #[error("collection invariants violated: {}", summarize(.0))]
    Inconsistent(Vec<ValidationError>),

    /// Configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(String),
}

impl EngineError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "E2001",
            Self::GroupNotFound(_) => "E2002",
            Self::TooFewGroupMembers { .. } => "E2101",
            Self::AlreadyGrouped { .. } => "E2102",
            Self::NotGrouped(_) => "E2103",
            Self::NotGroupMember { .. } => "E2104",
            Self::InvalidGroupOrder { .. } => "E2105",
            Self::InvalidInterval { .. } => "E2106",
            Self::DuplicateItemId(_) => "E2201",
            Self::EmptyName => "E2202",
            Self::CyclicPredecessor { .. } => "E2203",
            Self::Inconsistent(_) => "E9001",
            Self::Config(_) => "E1002",
        }
    }

    /// Whether the caller can fix the request and retry.
    ///
    /// Everything except [`EngineError::Inconsistent`] is a rejected
    /// request. `Inconsistent` means the resulting collection breaks an
    /// invariant: either the input collection was already malformed (for
    /// example built by hand and passed to a date-only command), or the
    /// engine itself has a bug.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::Inconsistent(_))
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
