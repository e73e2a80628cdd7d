//! Timeline domain models.
//!
//! Provides the data types the engine operates on: items, groups,
//! warnings, the per-project collection, and the calendar types dates are
//! measured against.
//!
//! # Domain Mappings
//!
//! | u-timeline | Construction | Events | Software |
//! |------------|--------------|--------|----------|
//! | Item | Work package | Session | Ticket |
//! | Group | Trade hand-off chain | Track | Release train |
//! | Warning | Out-of-sequence start | Overbooked speaker | Blocked start |
//! | Timeline | Project plan | Program | Roadmap |

mod calendar;
mod group;
mod item;
mod timeline;
mod warning;

pub use calendar::{DateWindow, WorkCalendar};
pub use group::{Group, GroupId};
pub use item::{Item, ItemId, ItemPayload};
pub use timeline::Timeline;
pub use warning::Warning;
