//! Detect team collisions between matchups and overlapping schedule windows.
//!
//! A team may appear in at most one matchup per schedule, in either role. The
//! comparison is pairwise across home and away: a candidate's home team is
//! checked against both teams of every other matchup, and likewise its away team.

use serde::Serialize;

use crate::model::{Matchup, MatchupDetails, MatchupId, Schedule, ScheduleId, TeamId};

/// A candidate matchup shares `team` with the existing matchup `matchup_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConflict {
    pub team: TeamId,
    pub matchup_id: MatchupId,
}

/// Find the first existing matchup that shares a team with `candidate`.
///
/// The matchup identified by `exclude` is skipped, so an update may keep its
/// own teams without colliding with itself.
pub fn find_team_conflict<'a>(
    matchups: impl IntoIterator<Item = &'a Matchup>,
    candidate: &MatchupDetails,
    exclude: Option<&MatchupId>,
) -> Option<TeamConflict> {
    for existing in matchups {
        if exclude == Some(&existing.id) {
            continue;
        }
        for team in candidate.teams() {
            if existing.involves(team) {
                return Some(TeamConflict {
                    team: team.clone(),
                    matchup_id: existing.id.clone(),
                });
            }
        }
    }
    None
}

/// Something wrong with a set of already stored schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Finding {
    /// Two active schedules cover a common instant.
    #[serde(rename_all = "camelCase")]
    WindowOverlap { first: ScheduleId, second: ScheduleId },
    /// Two active schedules carry the same `(year, week)` label.
    #[serde(rename_all = "camelCase")]
    DuplicateLabel {
        first: ScheduleId,
        second: ScheduleId,
        year: i32,
        week: u32,
    },
    /// `closes` lies outside the schedule window.
    #[serde(rename_all = "camelCase")]
    ClosesOutsideWindow { schedule: ScheduleId },
    #[serde(rename_all = "camelCase")]
    MatchupOutsideWindow {
        schedule: ScheduleId,
        matchup: MatchupId,
    },
    /// `team` plays in both `first` and `second` within one schedule.
    #[serde(rename_all = "camelCase")]
    TeamPlaysTwice {
        schedule: ScheduleId,
        team: TeamId,
        first: MatchupId,
        second: MatchupId,
    },
}

/// Check stored schedules against the invariants the service enforces on write.
///
/// Deactivated schedules are ignored. Findings come out in input order.
pub fn audit(schedules: &[Schedule]) -> Vec<Finding> {
    let active: Vec<&Schedule> = schedules.iter().filter(|s| s.is_active()).collect();
    let mut findings = Vec::new();

    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if a.window().overlaps(&b.window()) {
                findings.push(Finding::WindowOverlap {
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
            if a.year == b.year && a.week == b.week {
                findings.push(Finding::DuplicateLabel {
                    first: a.id.clone(),
                    second: b.id.clone(),
                    year: a.year,
                    week: a.week,
                });
            }
        }
    }

    for schedule in active {
        audit_schedule(schedule, &mut findings);
    }

    findings
}

fn audit_schedule(schedule: &Schedule, findings: &mut Vec<Finding>) {
    if !schedule.contains(schedule.closes) {
        findings.push(Finding::ClosesOutsideWindow {
            schedule: schedule.id.clone(),
        });
    }

    let matchups: Vec<&Matchup> = schedule.matchups.values().collect();
    for (i, matchup) in matchups.iter().enumerate() {
        if !schedule.contains(matchup.date_time) {
            findings.push(Finding::MatchupOutsideWindow {
                schedule: schedule.id.clone(),
                matchup: matchup.id.clone(),
            });
        }

        // Only look at earlier matchups so each colliding pair is reported once.
        for earlier in &matchups[..i] {
            for team in matchup.teams() {
                if earlier.involves(team) {
                    findings.push(Finding::TeamPlaysTwice {
                        schedule: schedule.id.clone(),
                        team: team.clone(),
                        first: earlier.id.clone(),
                        second: matchup.id.clone(),
                    });
                }
            }
        }
    }
}
