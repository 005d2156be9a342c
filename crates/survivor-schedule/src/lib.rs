//! # survivor-schedule
//!
//! Weekly schedule windows and matchup validation for NFL survivor pools.
//!
//! A pool runs on weeks that start at 03:00 Tuesday US Eastern time. This crate
//! turns a calendar date into that canonical week, keeps at most one active
//! schedule per week, and makes sure no team plays twice within a schedule.
//!
//! ```rust
//! use survivor_schedule::week_window;
//!
//! // A Thursday belongs to the week that opened on the Tuesday before it.
//! let window = week_window("2025-02-13").unwrap();
//! assert_eq!(window.start.to_rfc3339(), "2025-02-11T08:00:00+00:00");
//! ```
//!
//! ## Modules
//!
//! - [`window`]: calendar date → `[start, end]` week window
//! - [`model`]: schedules, matchups, identifiers and requests
//! - [`conflict`]: team collisions and overlapping windows
//! - [`store`]: persistence collaborator trait and an in-memory store
//! - [`service`]: schedule creation and matchup validation
//! - [`teams`]: team roster
//! - [`config`]: week boundary configuration
//! - [`error`]: Error types

pub mod config;
pub mod conflict;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod teams;
pub mod window;

pub use config::ScheduleConfig;
pub use conflict::{audit, find_team_conflict, Finding, TeamConflict};
pub use error::{ScheduleError, StoreError};
pub use model::{
    AddMatchupRequest, CreateScheduleRequest, Lifecycle, Matchup, MatchupDetails, MatchupId,
    Schedule, ScheduleId, TeamId, UpdateMatchupRequest,
};
pub use service::ScheduleService;
pub use store::{InMemoryScheduleStore, ScheduleStore};
pub use teams::{Team, TeamRoster};
pub use window::{week_window, WeekWindow, WindowCalculator};
