//! Weekly schedules, their matchups, and the requests that create or change them.
//!
//! A [`Schedule`] owns its matchups outright: a [`Matchup`] only gets an
//! identifier when it is added to a schedule and has no storage of its own.
//! Field names serialize in camelCase to match the JSON documents the pool
//! backend stores.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::window::WeekWindow;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique identifier of a [`Schedule`].
    ScheduleId
);

string_id!(
    /// Identifier of a [`Matchup`], unique within its schedule.
    MatchupId
);

string_id!(
    /// Team identifier, e.g. `"NE"` or `"NYJ"`.
    TeamId
);

impl ScheduleId {
    /// A fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl MatchupId {
    /// A fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Soft-delete state of a schedule. Deactivated schedules are never returned
/// by store lookups but stay in the backing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Active,
    Deactivated,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        self == Lifecycle::Active
    }
}

/// One week of the pool's contest and its pick-submission cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    /// Season label (e.g. 2024 for the 2024-2025 season). Display only.
    pub year: i32,
    /// Week label within the season. Display only.
    pub week: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub opens: DateTime<Utc>,
    /// Cutoff for submitting picks; always inside `[start, end]`.
    pub closes: DateTime<Utc>,
    #[serde(default)]
    pub matchups: BTreeMap<MatchupId, Matchup>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    /// Bumped by the store on every successful write.
    #[serde(default)]
    pub version: u64,
}

impl Schedule {
    pub fn window(&self) -> WeekWindow {
        WeekWindow::new(self.start, self.end)
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Whether `at` lies inside `[start, end]`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.window().contains(at)
    }
}

/// A game between two teams, scoped to exactly one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub id: MatchupId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub date_time: DateTime<Utc>,
}

impl Matchup {
    pub fn teams(&self) -> [&TeamId; 2] {
        [&self.home_team, &self.away_team]
    }

    /// Whether `team` plays in this matchup, home or away.
    pub fn involves(&self, team: &TeamId) -> bool {
        self.home_team == *team || self.away_team == *team
    }
}

/// The caller-supplied part of a matchup, before it has an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupDetails {
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub date_time: DateTime<Utc>,
}

impl MatchupDetails {
    pub fn new(
        home_team: impl Into<TeamId>,
        away_team: impl Into<TeamId>,
        date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            date_time,
        }
    }

    pub fn teams(&self) -> [&TeamId; 2] {
        [&self.home_team, &self.away_team]
    }

    pub fn into_matchup(self, id: MatchupId) -> Matchup {
        Matchup {
            id,
            home_team: self.home_team,
            away_team: self.away_team,
            date_time: self.date_time,
        }
    }
}

/// Request to create the schedule for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub year: i32,
    pub week: u32,
    /// Any `YYYY-MM-DD` date inside the intended week, read in the reference zone.
    pub date: String,
    pub closes: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMatchupRequest {
    pub schedule_id: ScheduleId,
    pub matchup: Option<MatchupDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchupRequest {
    pub schedule_id: ScheduleId,
    pub matchup_id: MatchupId,
    pub matchup: Option<MatchupDetails>,
}
