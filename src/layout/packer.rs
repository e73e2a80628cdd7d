//! First-fit lane packer.
//!
//! # Algorithm
//!
//! 1. Clip every item to the window; drop items with no visible day.
//! 2. Sort by clipped start ascending, then clipped span descending, then id.
//! 3. For each item, scan lanes from 0 and take the first lane whose
//!    occupancy is free on every clipped day. Open a new lane if none fits.
//!
//! The longest-first tie-break reduces fragmentation; the id tie-break
//! makes the output independent of input order.
//!
//! # Complexity
//! O(n log n + n * L * w) where n=visible items, L=lanes, w=window days.

use serde::{Deserialize, Serialize};

use crate::models::{DateWindow, Item, ItemId};

/// Where one item is drawn inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanePlacement {
    /// Placed item.
    pub item_id: ItemId,
    /// Zero-based lane (row) index.
    pub lane: usize,
    /// Day offset of the visible start from the window start.
    pub start_offset: i64,
    /// Number of visible days (>= 1).
    pub span_days: i64,
    /// Whether the visible start is the item's real start (start handle shown).
    pub starts_here: bool,
    /// Whether the visible end is the item's real end (end handle shown).
    pub ends_here: bool,
}

impl LanePlacement {
    /// Day offset of the last visible day.
    #[inline]
    pub fn end_offset(&self) -> i64 {
        self.start_offset + self.span_days - 1
    }

    /// Whether two placements share at least one visible day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_offset <= other.end_offset() && other.start_offset <= self.end_offset()
    }
}

/// Per-day occupancy of a single lane.
#[derive(Debug, Clone)]
struct Lane {
    occupied: Vec<bool>,
}

impl Lane {
    fn new(days: usize) -> Self {
        Self {
            occupied: vec![false; days],
        }
    }

    fn is_free(&self, from: usize, to: usize) -> bool {
        self.occupied[from..=to].iter().all(|busy| !busy)
    }

    fn occupy(&mut self, from: usize, to: usize) {
        for slot in &mut self.occupied[from..=to] {
            *slot = true;
        }
    }
}

/// Lane assignment for every visible item in one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneLayout {
    /// Window the layout was computed for.
    pub window: DateWindow,
    /// Placements in packing order.
    pub placements: Vec<LanePlacement>,
    /// Number of lanes opened.
    pub lane_count: usize,
}

impl LaneLayout {
    /// Placement of a given item, if it is visible in the window.
    pub fn placement_for(&self, item_id: ItemId) -> Option<&LanePlacement> {
        self.placements.iter().find(|p| p.item_id == item_id)
    }

    /// Placements in one lane, ordered by start offset.
    pub fn lane(&self, lane: usize) -> Vec<&LanePlacement> {
        let mut in_lane: Vec<&LanePlacement> =
            self.placements.iter().filter(|p| p.lane == lane).collect();
        in_lane.sort_by_key(|p| p.start_offset);
        in_lane
    }

    /// Whether no item is visible.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

struct Candidate<'a> {
    item: &'a Item,
    from: usize,
    to: usize,
}

impl Candidate<'_> {
    fn span(&self) -> usize {
        self.to - self.from + 1
    }
}

/// Packs the items overlapping `window` into non-overlapping lanes.
///
/// ```
/// use chrono::NaiveDate;
/// use u_timeline::layout::pack_lanes;
/// use u_timeline::models::{DateWindow, Item};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
/// let items = vec![
///     Item::new(1, "A", day(4), day(8)),
///     Item::new(2, "B", day(6), day(10)),
/// ];
/// let layout = pack_lanes(&DateWindow::new(day(4), day(10)), &items);
/// assert_eq!(layout.placement_for(1).unwrap().lane, 0);
/// assert_eq!(layout.placement_for(2).unwrap().lane, 1);
/// ```
pub fn pack_lanes(window: &DateWindow, items: &[Item]) -> LaneLayout {
    let mut candidates: Vec<Candidate<'_>> = items
        .iter()
        .filter_map(|item| {
            let (start, end) = window.clip(item.start, item.end)?;
            Some(Candidate {
                item,
                from: usize::try_from(window.offset_of(start)).ok()?,
                to: usize::try_from(window.offset_of(end)).ok()?,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.from
            .cmp(&b.from)
            .then_with(|| b.span().cmp(&a.span()))
            .then_with(|| a.item.id.cmp(&b.item.id))
    });

    let days = usize::try_from(window.len_days()).unwrap_or(0);
    let mut lanes: Vec<Lane> = Vec::new();
    let mut placements = Vec::with_capacity(candidates.len());

    for candidate in &candidates {
        let lane = match lanes
            .iter()
            .position(|lane| lane.is_free(candidate.from, candidate.to))
        {
            Some(index) => index,
            None => {
                lanes.push(Lane::new(days));
                lanes.len() - 1
            }
        };
        lanes[lane].occupy(candidate.from, candidate.to);

        placements.push(LanePlacement {
            item_id: candidate.item.id,
            lane,
            start_offset: candidate.from as i64,
            span_days: candidate.span() as i64,
            starts_here: window.contains(candidate.item.start),
            ends_here: window.contains(candidate.item.end),
        });
    }

    LaneLayout {
        window: *window,
        placements,
        lane_count: lanes.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn week() -> DateWindow {
        DateWindow::new(d(4), d(10))
    }

    #[test]
    fn test_overlapping_items_split_lanes() {
        // A: Day0-Day4, B: Day2-Day6
        let items = vec![Item::new(1, "A", d(4), d(8)), Item::new(2, "B", d(6), d(10))];
        let layout = pack_lanes(&week(), &items);
        assert_eq!(layout.placement_for(1).unwrap().lane, 0);
        assert_eq!(layout.placement_for(2).unwrap().lane, 1);
        assert_eq!(layout.lane_count, 2);
    }

    #[test]
    fn test_disjoint_items_share_lane() {
        let items = vec![Item::new(1, "A", d(4), d(5)), Item::new(2, "B", d(6), d(10))];
        let layout = pack_lanes(&week(), &items);
        assert_eq!(layout.lane_count, 1);
        assert_eq!(layout.lane(0).len(), 2);
    }

    #[test]
    fn test_longer_item_first_on_tie() {
        let items = vec![Item::new(1, "short", d(4), d(5)), Item::new(2, "long", d(4), d(9))];
        let layout = pack_lanes(&week(), &items);
        assert_eq!(layout.placement_for(2).unwrap().lane, 0);
        assert_eq!(layout.placement_for(1).unwrap().lane, 1);
        assert_eq!(layout.placements[0].item_id, 2);
    }

    #[test]
    fn test_first_fit_reuses_lower_lane() {
        // lane 0: B(4-9); lane 1: A(4-5); C(7-8) fits beside A in lane 1
        let items = vec![
            Item::new(1, "A", d(4), d(5)),
            Item::new(2, "B", d(4), d(9)),
            Item::new(3, "C", d(7), d(8)),
        ];
        let layout = pack_lanes(&week(), &items);
        assert_eq!(layout.placement_for(2).unwrap().lane, 0);
        assert_eq!(layout.placement_for(1).unwrap().lane, 1);
        assert_eq!(layout.placement_for(3).unwrap().lane, 1);
    }

    #[test]
    fn test_clipping_and_handles() {
        let items = vec![
            Item::new(1, "before", d(1), d(5)),
            Item::new(2, "after", d(9), d(20)),
            Item::new(3, "inside", d(6), d(7)),
        ];
        let layout = pack_lanes(&week(), &items);

        let before = layout.placement_for(1).unwrap();
        assert_eq!(before.start_offset, 0);
        assert_eq!(before.span_days, 2);
        assert!(!before.starts_here);
        assert!(before.ends_here);

        let after = layout.placement_for(2).unwrap();
        assert_eq!(after.start_offset, 5);
        assert_eq!(after.span_days, 2);
        assert!(after.starts_here);
        assert!(!after.ends_here);

        let inside = layout.placement_for(3).unwrap();
        assert!(inside.starts_here && inside.ends_here);
    }

    #[test]
    fn test_item_spanning_whole_window() {
        let items = vec![Item::new(1, "long", d(1), d(30))];
        let layout = pack_lanes(&week(), &items);
        let p = layout.placement_for(1).unwrap();
        assert_eq!((p.lane, p.start_offset, p.span_days), (0, 0, 7));
        assert!(!p.starts_here && !p.ends_here);
    }

    #[test]
    fn test_invisible_items_excluded() {
        let items = vec![Item::new(1, "past", d(1), d(3)), Item::new(2, "future", d(11), d(12))];
        let layout = pack_lanes(&week(), &items);
        assert!(layout.is_empty());
        assert_eq!(layout.lane_count, 0);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let a = Item::new(1, "A", d(4), d(6));
        let b = Item::new(2, "B", d(4), d(6));
        let c = Item::new(3, "C", d(5), d(9));
        let forward = pack_lanes(&week(), &[a.clone(), b.clone(), c.clone()]);
        let backward = pack_lanes(&week(), &[c, b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_no_shared_lane_overlap() {
        let items: Vec<Item> = (0..12u32)
            .map(|n| Item::new(u64::from(n), "x", d(1 + n % 6), d(4 + n % 9)))
            .collect();
        let layout = pack_lanes(&week(), &items);
        for a in &layout.placements {
            for b in &layout.placements {
                if a.item_id != b.item_id && a.lane == b.lane {
                    assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
                }
            }
        }
    }
}
