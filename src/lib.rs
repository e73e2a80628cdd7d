//! Interval scheduling and timeline layout engine.
//!
//! Lays out, moves, resizes and groups date-ranged work items on a
//! calendar/timeline, keeping grouped items in lock-step and flagging items
//! that start before their predecessor ends. The crate is a pure
//! state-transition function over an item/group collection: it never
//! renders, persists or reads the clock.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Item`, `Group`, `Timeline`, `Warning`,
//!   `DateWindow`, `WorkCalendar`
//! - **`dates`**: Day arithmetic and business-day durations
//! - **`conflict`**: Predecessor ordering warnings
//! - **`layout`**: First-fit lane packing within a window, week rows
//! - **`scheduler`**: Move/resize, group coherence, item lifecycle,
//!   normalization, summary metrics
//! - **`engine`**: Command façade (`TimelineEngine::apply`)
//! - **`validation`**: Collection invariant checks, predecessor cycles
//! - **`config`**: TOML-loadable engine settings
//!
//! # Architecture
//!
//! Commands enter [`engine::TimelineEngine`], which delegates to
//! [`scheduler`], normalizes, validates and recomputes warnings. Layout is
//! computed separately for whatever window the host displays. All dates
//! are day-granular [`chrono::NaiveDate`]s and all ranges are inclusive.
//!
//! # References
//!
//! - Golumbic (2004), "Algorithmic Graph Theory and Perfect Graphs"
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod conflict;
pub mod dates;
pub mod engine;
pub mod error;
pub mod layout;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::EngineConfig;
pub use engine::{Command, Outcome, TimelineEngine};
pub use error::EngineError;
pub use models::{DateWindow, Group, GroupId, Item, ItemId, ItemPayload, Timeline, Warning};
