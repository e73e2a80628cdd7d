//! Mutation façade.
//!
//! [`TimelineEngine::apply`] is the single entry point for changing a
//! timeline. Each call is atomic and stateless:
//!
//! 1. validate the request and delegate to the scheduler
//! 2. run the normalize pipeline (structural commands)
//! 3. check the collection invariants
//! 4. recompute predecessor warnings from scratch
//!
//! A rejected command returns an error and the caller keeps its timeline;
//! the engine never mutates its input.
//!
//! # Example
//! ```
//! use chrono::NaiveDate;
//! use u_timeline::engine::{Command, TimelineEngine};
//! use u_timeline::models::Timeline;
//! use u_timeline::scheduler::NewItem;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let engine = TimelineEngine::default();
//!
//! let out = engine
//!     .apply(&Timeline::new(), Command::CreateItem(NewItem::new("Survey", day(4), day(6))))
//!     .unwrap();
//! let out = engine
//!     .apply(&out.timeline, Command::MoveItem { id: 1, new_start: day(11) })
//!     .unwrap();
//! assert_eq!(out.timeline.item(1).unwrap().end, day(13));
//! assert!(out.warnings.is_empty());
//! ```

mod command;

pub use command::Command;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::conflict::detect_conflicts;
use crate::error::EngineError;
use crate::layout::{self, LaneLayout, WeekRow};
use crate::models::{DateWindow, GroupId, ItemId, Timeline, Warning};
use crate::scheduler::{self, normalize_in_place, Change, TimelineSummary};
use crate::validation::validate_timeline;

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The new collection.
    pub timeline: Timeline,
    /// Predecessor warnings for the new collection.
    pub warnings: Vec<Warning>,
    /// Items whose record changed.
    pub affected: Vec<ItemId>,
    /// Id allocated by `CreateItem`.
    pub created_item: Option<ItemId>,
    /// Id allocated by `CreateGroup`.
    pub created_group: Option<GroupId>,
    /// Groups dissolved as a side effect.
    pub dissolved_groups: Vec<GroupId>,
}

/// Applies commands to timelines under one configuration.
#[derive(Debug, Clone, Default)]
pub struct TimelineEngine {
    config: EngineConfig,
}

impl TimelineEngine {
    /// Creates an engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies one command.
    ///
    /// # Errors
    /// Any validation error of the delegated operation, or
    /// [`EngineError::Inconsistent`] if the result breaks a collection
    /// invariant.
    pub fn apply(&self, timeline: &Timeline, command: Command) -> Result<Outcome, EngineError> {
        let kind = command.kind();
        let structural = command.is_structural();
        let mut change = self.dispatch(timeline, command)?;

        if structural {
            let report = normalize_in_place(&mut change.timeline);
            change.dissolved_groups.extend(report.dissolved);
            for id in report.released.into_iter().chain(report.linked) {
                if !change.affected.contains(&id) {
                    change.affected.push(id);
                }
            }
        }
        if let Err(errors) = validate_timeline(&change.timeline) {
            warn!(command = kind, errors = errors.len(), "command broke collection invariants");
            return Err(EngineError::Inconsistent(errors));
        }

        let warnings = detect_conflicts(&change.timeline.items);
        debug!(
            command = kind,
            affected = ?change.affected,
            warnings = warnings.len(),
            "applied command"
        );
        Ok(Outcome {
            timeline: change.timeline,
            warnings,
            affected: change.affected,
            created_item: change.created_item,
            created_group: change.created_group,
            dissolved_groups: change.dissolved_groups,
        })
    }

    fn dispatch(&self, timeline: &Timeline, command: Command) -> Result<Change, EngineError> {
        match command {
            Command::CreateItem(new_item) => scheduler::create_item(timeline, new_item),
            Command::RenameItem { id, name } => scheduler::rename_item(timeline, id, &name),
            Command::SetPredecessor { id, predecessor_id } => {
                scheduler::set_predecessor(timeline, id, predecessor_id)
            }
            Command::UpdatePayload { id, payload } => {
                scheduler::update_payload(timeline, id, payload)
            }
            Command::MoveItem { id, new_start } => {
                scheduler::move_item(timeline, id, new_start, &self.config)
            }
            Command::ResizeItem { id, side, date } => {
                scheduler::resize_item(timeline, id, side, date)
            }
            Command::CreateGroup {
                item_ids,
                name,
                color,
            } => scheduler::create_group(timeline, &item_ids, name, color),
            Command::UngroupItem { id } => scheduler::ungroup_item(timeline, id),
            Command::DeleteItems { ids } => scheduler::delete_items(timeline, &ids),
            Command::SetInterval {
                group_id,
                previous_id,
                shift_id,
                gap_days,
            } => scheduler::set_interval(timeline, &group_id, previous_id, shift_id, gap_days),
            Command::ReorderGroup { group_id, order } => {
                scheduler::reorder_group(timeline, &group_id, &order)
            }
            Command::ReplaceAll { items, groups } => {
                scheduler::replace_all(timeline, items, groups)
            }
        }
    }

    /// Current predecessor warnings, without changing anything.
    pub fn warnings(&self, timeline: &Timeline) -> Vec<Warning> {
        detect_conflicts(&timeline.items)
    }

    /// Lane layout of the timeline within `window`.
    pub fn layout(&self, timeline: &Timeline, window: &DateWindow) -> LaneLayout {
        layout::pack_lanes(window, &timeline.items)
    }

    /// Week-row layout covering `range`, weeks starting on the configured day.
    pub fn layout_weeks(&self, timeline: &Timeline, range: &DateWindow) -> Vec<WeekRow> {
        layout::layout_weeks(&timeline.items, range, self.config.week_start)
    }

    /// Summary metrics under the configured work calendar.
    pub fn summary(&self, timeline: &Timeline) -> TimelineSummary {
        TimelineSummary::calculate(timeline, &self.config.calendar)
    }
}
