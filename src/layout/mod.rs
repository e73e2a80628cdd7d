//! Timeline layout: lane packing within bounded windows.
//!
//! Assigns every item visible in a window a lane (row) so that items
//! sharing a lane never overlap. The strategy is greedy first-fit, not
//! globally optimal, and fully deterministic.
//!
//! # Usage
//!
//! ```
//! use chrono::{NaiveDate, Weekday};
//! use u_timeline::layout::layout_weeks;
//! use u_timeline::models::{DateWindow, Item};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let items = vec![Item::new(1, "Kickoff", day(4), day(5))];
//! let rows = layout_weeks(&items, &DateWindow::new(day(1), day(31)), Weekday::Mon);
//! assert!(rows.iter().any(|r| r.layout.placement_for(1).is_some()));
//! ```
//!
//! # References
//!
//! - Golumbic (2004), "Algorithmic Graph Theory and Perfect Graphs", Ch. 8
//!   (interval graph coloring)

mod packer;
mod weeks;

pub use packer::{pack_lanes, LaneLayout, LanePlacement};
pub use weeks::{layout_weeks, WeekRow};
