//! Collection-level metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Span | Inclusive days from the earliest start to the latest end |
//! | Business days | Sum of working days over every item |
//! | Conflicts | Items starting before their predecessor ends |
//! | Avg progress | Mean payload progress |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflict::detect_conflicts;
use crate::dates::business_day_duration;
use crate::models::{Timeline, WorkCalendar};

/// Summary of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    /// Number of items.
    pub item_count: usize,
    /// Number of groups.
    pub group_count: usize,
    /// Items that belong to a group.
    pub grouped_item_count: usize,
    /// Earliest item start.
    pub earliest_start: Option<NaiveDate>,
    /// Latest item end.
    pub latest_end: Option<NaiveDate>,
    /// Inclusive days between `earliest_start` and `latest_end` (0 if empty).
    pub span_days: i64,
    /// Working days summed over all items.
    pub total_business_days: i64,
    /// Number of predecessor warnings.
    pub conflict_count: usize,
    /// Mean progress percentage (0.0 if empty).
    pub average_progress: f64,
}

impl TimelineSummary {
    /// Computes the summary.
    pub fn calculate(timeline: &Timeline, calendar: &WorkCalendar) -> Self {
        let span = timeline.span();
        let total_business_days = timeline
            .items
            .iter()
            .map(|item| business_day_duration(item.start, item.end, calendar))
            .sum();

        let average_progress = if timeline.is_empty() {
            0.0
        } else {
            let sum: f64 = timeline
                .items
                .iter()
                .map(|i| f64::from(i.payload.progress))
                .sum();
            sum / timeline.item_count() as f64
        };

        Self {
            item_count: timeline.item_count(),
            group_count: timeline.group_count(),
            grouped_item_count: timeline.items.iter().filter(|i| i.is_grouped()).count(),
            earliest_start: span.map(|w| w.start),
            latest_end: span.map(|w| w.end),
            span_days: span.map_or(0, |w| w.len_days()),
            total_business_days,
            conflict_count: detect_conflicts(&timeline.items).len(),
            average_progress,
        }
    }

    /// Whether the timeline has no ordering conflicts.
    pub fn is_conflict_free(&self) -> bool {
        self.conflict_count == 0
    }
}
