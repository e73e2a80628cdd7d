//! Collection normalization pipeline.
//!
//! Structural commands (ungroup, delete, replace) can leave membership
//! lists pointing at items that are gone, groups that are too small, or
//! item links that disagree with the lists. The pipeline repairs all of
//! that in a fixed order. Group membership lists are the source of truth;
//! `Item::group_id` is re-derived from them in the last step.
//!
//! # Steps
//! 1. Drop members that are not items.
//! 2. Drop repeated memberships (first listing wins, across groups too).
//! 3. Dissolve groups with fewer than two members.
//! 4. Re-derive every item's `group_id` from the remaining lists.
//!
//! Running the pipeline on its own output changes nothing.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::models::{Group, GroupId, ItemId, Timeline};

/// What the pipeline changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Groups removed for being under-sized.
    pub dissolved: Vec<GroupId>,
    /// Items whose `group_id` was cleared.
    pub released: Vec<ItemId>,
    /// Items whose `group_id` was set from a membership list.
    pub linked: Vec<ItemId>,
}

impl NormalizeReport {
    /// Whether the pipeline changed anything.
    pub fn is_empty(&self) -> bool {
        self.dissolved.is_empty() && self.released.is_empty() && self.linked.is_empty()
    }
}

type Step = fn(&mut Timeline, &mut NormalizeReport);

const PIPELINE: [(&str, Step); 4] = [
    ("drop_missing_members", drop_missing_members),
    ("drop_repeated_memberships", drop_repeated_memberships),
    ("dissolve_undersized_groups", dissolve_undersized_groups),
    ("sync_item_links", sync_item_links),
];

/// Returns a normalized copy of `timeline` and what changed.
pub fn normalize(timeline: &Timeline) -> (Timeline, NormalizeReport) {
    let mut next = timeline.clone();
    let report = normalize_in_place(&mut next);
    (next, report)
}

/// Normalizes a timeline the caller already owns.
pub(crate) fn normalize_in_place(timeline: &mut Timeline) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    for (name, step) in PIPELINE {
        step(timeline, &mut report);
        tracing::trace!(step = name, "normalize step done");
    }
    if !report.dissolved.is_empty() {
        info!(groups = ?report.dissolved, "dissolved under-sized groups");
    }
    report
}

fn drop_missing_members(timeline: &mut Timeline, _report: &mut NormalizeReport) {
    let known: HashSet<ItemId> = timeline.items.iter().map(|i| i.id).collect();
    for group in &mut timeline.groups {
        group.task_ids.retain(|id| known.contains(id));
    }
}

fn drop_repeated_memberships(timeline: &mut Timeline, _report: &mut NormalizeReport) {
    let mut seen = HashSet::new();
    for group in &mut timeline.groups {
        group.task_ids.retain(|id| seen.insert(*id));
    }
}

fn dissolve_undersized_groups(timeline: &mut Timeline, report: &mut NormalizeReport) {
    let (keep, dissolve): (Vec<Group>, Vec<Group>) = std::mem::take(&mut timeline.groups)
        .into_iter()
        .partition(Group::is_viable);
    timeline.groups = keep;
    report.dissolved.extend(dissolve.into_iter().map(|g| g.id));
}

fn sync_item_links(timeline: &mut Timeline, report: &mut NormalizeReport) {
    let owner: HashMap<ItemId, GroupId> = timeline
        .groups
        .iter()
        .flat_map(|g| g.task_ids.iter().map(move |id| (*id, g.id.clone())))
        .collect();

    for item in &mut timeline.items {
        let listed = owner.get(&item.id).cloned();
        if item.group_id == listed {
            continue;
        }
        if listed.is_none() {
            report.released.push(item.id);
        } else {
            report.linked.push(item.id);
        }
        item.group_id = listed;
    }
}
