//! Schedule service -- gates schedule creation and matchup changes.
//!
//! Every write runs the same way: derive or load the schedule, apply the
//! validation rules, then hand at most one write to the store. Rejections are
//! typed [`ScheduleError`]s and are never retried here.
//!
//! The uniqueness checks in [`ScheduleService::create_schedule`] and the insert
//! that follows are separate store calls. Two concurrent creations for the same
//! week can both pass the checks unless the store enforces uniqueness itself.
//! Matchup writes are read-modify-write guarded by the schedule version, so a
//! concurrent change surfaces as `StoreError::VersionConflict`.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::conflict::find_team_conflict;
use crate::error::{ConflictKey, LookupKey, MatchupInvalidReason, Result, ScheduleError};
use crate::model::{
    AddMatchupRequest, CreateScheduleRequest, Lifecycle, MatchupDetails, MatchupId, Schedule,
    ScheduleId, UpdateMatchupRequest,
};
use crate::store::ScheduleStore;
use crate::teams::TeamRoster;
use crate::window::WindowCalculator;

pub struct ScheduleService<S> {
    store: S,
    calculator: WindowCalculator,
    roster: Option<TeamRoster>,
}

impl<S: ScheduleStore> ScheduleService<S> {
    pub fn new(store: S, calculator: WindowCalculator) -> Self {
        Self {
            store,
            calculator,
            roster: None,
        }
    }

    /// Reject matchups naming teams that are not on `roster`.
    pub fn with_roster(mut self, roster: TeamRoster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn calculator(&self) -> &WindowCalculator {
        &self.calculator
    }

    /// Create the schedule for the week containing `request.date`.
    ///
    /// Checks run in a fixed order so the earliest detectable problem wins:
    /// 1. an active schedule already covers the computed window (`Conflict` by date),
    /// 2. an active schedule already has the `(year, week)` label (`Conflict` by label),
    /// 3. `closes` lies outside the window (`InvalidCloses`).
    pub fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<Schedule> {
        let window = self.calculator.window_for_date(&request.date)?;

        for boundary in [window.start, window.end] {
            let existing = self
                .store
                .get_by_date_time(boundary)
                .map_err(ScheduleError::store("failed to look up schedule by date"))?;
            if let Some(existing) = existing {
                warn!(date = %request.date, id = %existing.id, "schedule window conflict");
                return Err(ScheduleError::Conflict {
                    id: existing.id,
                    key: ConflictKey::Date(request.date.clone()),
                });
            }
        }

        let existing = self
            .store
            .get_by_year_and_week(request.year, request.week)
            .map_err(ScheduleError::store("failed to look up schedule by year/week"))?;
        if let Some(existing) = existing {
            warn!(
                year = request.year,
                week = request.week,
                id = %existing.id,
                "schedule label conflict"
            );
            return Err(ScheduleError::Conflict {
                id: existing.id,
                key: ConflictKey::YearWeek {
                    year: request.year,
                    week: request.week,
                },
            });
        }

        if !window.contains(request.closes) {
            warn!(
                closes = %request.closes,
                start = %window.start,
                end = %window.end,
                "closes outside window"
            );
            return Err(ScheduleError::InvalidCloses {
                window,
                request: request.clone(),
            });
        }

        let schedule = Schedule {
            id: ScheduleId::generate(),
            year: request.year,
            week: request.week,
            start: window.start,
            end: window.end,
            opens: window.start,
            closes: request.closes,
            matchups: Default::default(),
            lifecycle: Lifecycle::Active,
            version: 0,
        };

        self.store
            .insert(&schedule)
            .map_err(ScheduleError::store("failed to insert schedule"))?;

        info!(id = %schedule.id, year = schedule.year, week = schedule.week, "created schedule");
        Ok(schedule)
    }

    pub fn get_by_id(&self, id: &ScheduleId) -> Result<Schedule> {
        debug!(%id, "loading schedule");
        self.store
            .get_by_id(id)
            .map_err(ScheduleError::store(format!("failed to look up schedule (id={id})")))?
            .ok_or_else(|| ScheduleError::NotFound {
                key: LookupKey::Id(id.clone()),
            })
    }

    pub fn get_by_year_and_week(&self, year: i32, week: u32) -> Result<Schedule> {
        debug!(year, week, "loading schedule");
        self.store
            .get_by_year_and_week(year, week)
            .map_err(ScheduleError::store(format!(
                "failed to look up schedule (year={year}, week={week})"
            )))?
            .ok_or(ScheduleError::NotFound {
                key: LookupKey::YearWeek { year, week },
            })
    }

    /// The schedule whose window contains `at`.
    pub fn get_by_date_time(&self, at: DateTime<Utc>) -> Result<Schedule> {
        debug!(%at, "loading schedule");
        self.store
            .get_by_date_time(at)
            .map_err(ScheduleError::store(format!(
                "failed to look up schedule (datetime={})",
                at.to_rfc3339()
            )))?
            .ok_or(ScheduleError::NotFound {
                key: LookupKey::DateTime(at),
            })
    }

    /// Add a new matchup to a schedule and return the updated schedule.
    pub fn add_matchup(&self, request: &AddMatchupRequest) -> Result<Schedule> {
        let mut schedule = self.get_by_id(&request.schedule_id)?;
        let details = self.validate_matchup(&schedule, request.matchup.as_ref(), None)?;

        let matchup = details.clone().into_matchup(MatchupId::generate());
        let matchup_id = matchup.id.clone();
        schedule.matchups.insert(matchup_id.clone(), matchup);

        let schedule = self.persist(schedule, "failed to add matchup")?;
        info!(schedule = %schedule.id, matchup = %matchup_id, "added matchup");
        Ok(schedule)
    }

    /// Replace an existing matchup in place and return the updated schedule.
    pub fn update_matchup(&self, request: &UpdateMatchupRequest) -> Result<Schedule> {
        let mut schedule = self.get_by_id(&request.schedule_id)?;
        if !schedule.matchups.contains_key(&request.matchup_id) {
            return Err(ScheduleError::MatchupNotFound {
                schedule_id: request.schedule_id.clone(),
                matchup_id: request.matchup_id.clone(),
            });
        }

        let details = self.validate_matchup(
            &schedule,
            request.matchup.as_ref(),
            Some(&request.matchup_id),
        )?;
        let matchup = details.clone().into_matchup(request.matchup_id.clone());
        schedule.matchups.insert(request.matchup_id.clone(), matchup);

        let schedule = self.persist(schedule, "failed to update matchup")?;
        info!(schedule = %schedule.id, matchup = %request.matchup_id, "updated matchup");
        Ok(schedule)
    }

    /// Remove a matchup and return the updated schedule.
    pub fn remove_matchup(
        &self,
        schedule_id: &ScheduleId,
        matchup_id: &MatchupId,
    ) -> Result<Schedule> {
        let mut schedule = self.get_by_id(schedule_id)?;
        if schedule.matchups.remove(matchup_id).is_none() {
            return Err(ScheduleError::MatchupNotFound {
                schedule_id: schedule_id.clone(),
                matchup_id: matchup_id.clone(),
            });
        }

        let schedule = self.persist(schedule, "failed to remove matchup")?;
        info!(schedule = %schedule.id, matchup = %matchup_id, "removed matchup");
        Ok(schedule)
    }

    /// Soft-delete a schedule. It stops appearing in lookups and conflict checks.
    pub fn deactivate(&self, id: &ScheduleId) -> Result<()> {
        let schedule = self.get_by_id(id)?;
        self.store
            .deactivate(&schedule.id)
            .map_err(ScheduleError::store(format!("failed to deactivate schedule (id={id})")))?;
        info!(%id, "deactivated schedule");
        Ok(())
    }

    fn persist(&self, mut schedule: Schedule, context: &str) -> Result<Schedule> {
        self.store.update(&schedule).map_err(ScheduleError::store(format!(
            "{context} (schedule={})",
            schedule.id
        )))?;
        schedule.version += 1;
        Ok(schedule)
    }

    /// Check a proposed matchup against `schedule`, skipping `exclude` in the
    /// team comparison.
    fn validate_matchup<'a>(
        &self,
        schedule: &Schedule,
        matchup: Option<&'a MatchupDetails>,
        exclude: Option<&MatchupId>,
    ) -> Result<&'a MatchupDetails> {
        let invalid = |reason: MatchupInvalidReason| {
            warn!(schedule = %schedule.id, %reason, "rejected matchup");
            ScheduleError::MatchupInvalid {
                schedule_id: schedule.id.clone(),
                matchup: matchup.cloned(),
                reason,
            }
        };

        let Some(details) = matchup else {
            return Err(invalid(MatchupInvalidReason::Missing));
        };

        if details
            .teams()
            .iter()
            .any(|team| team.as_str().trim().is_empty())
        {
            return Err(invalid(MatchupInvalidReason::BlankTeam));
        }

        if details.home_team == details.away_team {
            return Err(invalid(MatchupInvalidReason::SameTeam));
        }

        if let Some(roster) = &self.roster {
            if let Some(unknown) = details.teams().into_iter().find(|t| !roster.contains(t)) {
                return Err(invalid(MatchupInvalidReason::UnknownTeam(unknown.clone())));
            }
        }

        if !schedule.contains(details.date_time) {
            return Err(invalid(MatchupInvalidReason::OutsideWindow));
        }

        if let Some(conflict) = find_team_conflict(schedule.matchups.values(), details, exclude) {
            return Err(invalid(MatchupInvalidReason::TeamConflict {
                team: conflict.team,
                matchup_id: conflict.matchup_id,
            }));
        }

        Ok(details)
    }
}
