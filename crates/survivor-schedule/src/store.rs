//! Schedule persistence collaborator.
//!
//! [`ScheduleStore`] is the seam between the schedule service and whatever
//! document store backs it. Lookups return `Ok(None)` when nothing matches, so
//! "not found" stays distinct from a failed query. Only active schedules are
//! ever visible through the trait.
//!
//! Writes use optimistic concurrency: [`ScheduleStore::update`] replaces the
//! stored document only if its version still equals the version the caller
//! read, then bumps it by one.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::model::{Lifecycle, Schedule, ScheduleId};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait ScheduleStore: Send + Sync {
    /// Persist a new schedule.
    fn insert(&self, schedule: &Schedule) -> StoreResult<()>;

    /// The active schedule whose `[start, end]` contains `at`.
    fn get_by_date_time(&self, at: DateTime<Utc>) -> StoreResult<Option<Schedule>>;

    /// The active schedule labelled `(year, week)`.
    fn get_by_year_and_week(&self, year: i32, week: u32) -> StoreResult<Option<Schedule>>;

    fn get_by_id(&self, id: &ScheduleId) -> StoreResult<Option<Schedule>>;

    /// Replace the stored schedule with the same id.
    ///
    /// Fails with `StoreError::VersionConflict` unless the stored version equals
    /// `schedule.version`. On success the stored version is `schedule.version + 1`.
    fn update(&self, schedule: &Schedule) -> StoreResult<()>;

    /// Mark the schedule deactivated. It disappears from every lookup.
    fn deactivate(&self, id: &ScheduleId) -> StoreResult<()>;
}

impl<S: ScheduleStore + ?Sized> ScheduleStore for Arc<S> {
    fn insert(&self, schedule: &Schedule) -> StoreResult<()> {
        (**self).insert(schedule)
    }

    fn get_by_date_time(&self, at: DateTime<Utc>) -> StoreResult<Option<Schedule>> {
        (**self).get_by_date_time(at)
    }

    fn get_by_year_and_week(&self, year: i32, week: u32) -> StoreResult<Option<Schedule>> {
        (**self).get_by_year_and_week(year, week)
    }

    fn get_by_id(&self, id: &ScheduleId) -> StoreResult<Option<Schedule>> {
        (**self).get_by_id(id)
    }

    fn update(&self, schedule: &Schedule) -> StoreResult<()> {
        (**self).update(schedule)
    }

    fn deactivate(&self, id: &ScheduleId) -> StoreResult<()> {
        (**self).deactivate(id)
    }
}

/// The one place that decides whether a stored schedule is visible.
fn visible(schedule: &Schedule) -> bool {
    schedule.lifecycle.is_active()
}

/// A process-local store keyed by schedule id.
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    schedules: RwLock<HashMap<ScheduleId, Schedule>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored schedules, deactivated ones included.
    pub fn len(&self) -> usize {
        self.schedules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.read().is_empty()
    }

    /// Every stored schedule, deactivated ones included, ordered by start.
    pub fn snapshot(&self) -> Vec<Schedule> {
        let mut all: Vec<Schedule> = self.schedules.read().values().cloned().collect();
        all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        all
    }

    fn find_visible(&self, predicate: impl Fn(&Schedule) -> bool) -> Option<Schedule> {
        self.schedules
            .read()
            .values()
            .filter(|s| visible(s) && predicate(s))
            .min_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)))
            .cloned()
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn insert(&self, schedule: &Schedule) -> StoreResult<()> {
        let mut schedules = self.schedules.write();
        if schedules.contains_key(&schedule.id) {
            return Err(StoreError::DuplicateId(schedule.id.clone()));
        }
        schedules.insert(schedule.id.clone(), schedule.clone());
        Ok(())
    }

    fn get_by_date_time(&self, at: DateTime<Utc>) -> StoreResult<Option<Schedule>> {
        Ok(self.find_visible(|s| s.contains(at)))
    }

    fn get_by_year_and_week(&self, year: i32, week: u32) -> StoreResult<Option<Schedule>> {
        Ok(self.find_visible(|s| s.year == year && s.week == week))
    }

    fn get_by_id(&self, id: &ScheduleId) -> StoreResult<Option<Schedule>> {
        Ok(self.schedules.read().get(id).filter(|s| visible(s)).cloned())
    }

    fn update(&self, schedule: &Schedule) -> StoreResult<()> {
        let mut schedules = self.schedules.write();
        let stored = schedules
            .get_mut(&schedule.id)
            .filter(|s| visible(s))
            .ok_or_else(|| StoreError::NotFound(schedule.id.clone()))?;

        if stored.version != schedule.version {
            return Err(StoreError::VersionConflict {
                id: schedule.id.clone(),
                expected: schedule.version,
                found: stored.version,
            });
        }

        *stored = schedule.clone();
        stored.version += 1;
        Ok(())
    }

    fn deactivate(&self, id: &ScheduleId) -> StoreResult<()> {
        let mut schedules = self.schedules.write();
        let stored = schedules
            .get_mut(id)
            .filter(|s| visible(s))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        stored.lifecycle = Lifecycle::Deactivated;
        stored.version += 1;
        Ok(())
    }
}
