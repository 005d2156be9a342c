//! Error types for schedule and matchup operations.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use crate::model::{CreateScheduleRequest, MatchupDetails, MatchupId, ScheduleId, TeamId};
use crate::window::WeekWindow;

/// Errors returned by the window calculator and the schedule service.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The request date was not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date {date:?}: {reason}")]
    InvalidDate { date: String, reason: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A configuration value could not be used.
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// A configuration or roster document was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The week start falls into a gap of the reference zone (e.g. spring forward).
    #[error("Local time {0} does not exist in the reference time zone")]
    NonexistentLocalTime(NaiveDateTime),

    /// Another active schedule already covers the requested week or label.
    #[error("A schedule already exists for {key} (id={id})")]
    Conflict { id: ScheduleId, key: ConflictKey },

    /// The requested `closes` instant lies outside the computed week.
    #[error(
        "Schedule closes {} must fall between {} and {} (year={}, week={}, date={})",
        .request.closes, .window.start, .window.end, .request.year, .request.week, .request.date
    )]
    InvalidCloses {
        window: WeekWindow,
        request: CreateScheduleRequest,
    },

    #[error("Failed to find schedule ({key})")]
    NotFound { key: LookupKey },

    #[error("Failed to find matchup {matchup_id} in schedule {schedule_id}")]
    MatchupNotFound {
        schedule_id: ScheduleId,
        matchup_id: MatchupId,
    },

    #[error("Invalid matchup for schedule {schedule_id}: {reason}")]
    MatchupInvalid {
        schedule_id: ScheduleId,
        matchup: Option<MatchupDetails>,
        reason: MatchupInvalidReason,
    },

    /// A persistence call failed. `context` names the operation that issued it.
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl ScheduleError {
    /// Wrap a persistence failure with the operation that triggered it.
    pub fn store(context: impl Into<String>) -> impl FnOnce(StoreError) -> ScheduleError {
        let context = context.into();
        move |source| ScheduleError::Store { context, source }
    }
}

/// Errors raised by a [`ScheduleStore`](crate::store::ScheduleStore) implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Schedule {0} already exists")]
    DuplicateId(ScheduleId),

    #[error("Schedule {0} does not exist or is deactivated")]
    NotFound(ScheduleId),

    /// Conditional replace failed: the stored document moved on since it was read.
    #[error("Schedule {id} was modified concurrently (expected version {expected}, found {found})")]
    VersionConflict {
        id: ScheduleId,
        expected: u64,
        found: u64,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// The key that collided when creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKey {
    /// The requested date lands in an existing schedule's window.
    Date(String),
    /// The `(year, week)` label is already taken.
    YearWeek { year: i32, week: u32 },
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKey::Date(date) => write!(f, "date={date}"),
            ConflictKey::YearWeek { year, week } => write!(f, "year={year}/week={week}"),
        }
    }
}

/// The key used for a schedule lookup that came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Id(ScheduleId),
    YearWeek { year: i32, week: u32 },
    DateTime(DateTime<Utc>),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Id(id) => write!(f, "id={id}"),
            LookupKey::YearWeek { year, week } => write!(f, "year={year} week={week}"),
            LookupKey::DateTime(at) => write!(f, "datetime={}", at.to_rfc3339()),
        }
    }
}

/// Why a proposed matchup was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchupInvalidReason {
    /// The request carried no matchup at all.
    Missing,
    BlankTeam,
    SameTeam,
    /// The team is not on the configured roster.
    UnknownTeam(TeamId),
    OutsideWindow,
    /// `team` already plays in the existing matchup `matchup_id`.
    TeamConflict { team: TeamId, matchup_id: MatchupId },
}

impl fmt::Display for MatchupInvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchupInvalidReason::Missing => write!(f, "matchup is missing"),
            MatchupInvalidReason::BlankTeam => write!(f, "team identifier is blank"),
            MatchupInvalidReason::SameTeam => write!(f, "home and away teams are the same"),
            MatchupInvalidReason::UnknownTeam(team) => write!(f, "unknown team {team}"),
            MatchupInvalidReason::OutsideWindow => {
                write!(f, "matchup date/time falls outside the schedule window")
            }
            MatchupInvalidReason::TeamConflict { team, matchup_id } => {
                write!(f, "team {team} already plays in matchup {matchup_id}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
