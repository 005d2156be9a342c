//! Weekly window calculation -- converts a calendar date into the pool's
//! canonical `[start, end]` week.
//!
//! A pool week runs from 03:00 on Tuesday to 02:59:59.999 the following Tuesday
//! in US Eastern time, so Monday Night Football lands in the week it belongs to.
//! Local times are resolved through `chrono-tz`, which handles the EST/EDT switch.
//!
//! The end of a week is the start of the next week minus one millisecond, both
//! computed as local wall-clock times. Consecutive weeks therefore tile the
//! timeline without gaps or overlaps, even across DST transitions.

use chrono::{
    DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// US Eastern, the zone all week boundaries are anchored to.
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Date format accepted by [`WindowCalculator::window_for_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive time interval covering one pool week.
///
/// `end - start` is 7 days minus a millisecond, except in weeks containing a
/// DST switch: those run 167 or 169 hours because both bounds sit at the same
/// local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether `at` lies in `[start, end]`. Both bounds are inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether the two windows share at least one instant.
    pub fn overlaps(&self, other: &WeekWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn start_in(&self, tz: Tz) -> DateTime<Tz> {
        self.start.with_timezone(&tz)
    }

    pub fn end_in(&self, tz: Tz) -> DateTime<Tz> {
        self.end.with_timezone(&tz)
    }
}

/// Computes week windows for a fixed zone, start weekday and start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCalculator {
    timezone: Tz,
    start_weekday: Weekday,
    start_time: NaiveTime,
}

impl Default for WindowCalculator {
    /// Tuesday 03:00 US Eastern.
    fn default() -> Self {
        Self {
            timezone: REFERENCE_TIMEZONE,
            start_weekday: Weekday::Tue,
            start_time: NaiveTime::MIN + Duration::hours(3),
        }
    }
}

impl WindowCalculator {
    /// Build a calculator for weeks starting on `start_weekday` at `start_hour:00`.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` if `start_hour` is not in `0..24`.
    pub fn new(timezone: Tz, start_weekday: Weekday, start_hour: u32) -> Result<Self> {
        let start_time = NaiveTime::from_hms_opt(start_hour, 0, 0).ok_or_else(|| {
            ScheduleError::InvalidConfig {
                key: "week_start_hour".to_string(),
                reason: format!("{start_hour} is not an hour of the day"),
            }
        })?;

        Ok(Self {
            timezone,
            start_weekday,
            start_time,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn start_weekday(&self) -> Weekday {
        self.start_weekday
    }

    /// Compute the window for a `YYYY-MM-DD` date string.
    ///
    /// A date that falls on the start weekday opens a new week at that day's
    /// start time; any other date belongs to the week opened on the most recent
    /// start weekday before it.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidDate` if `date` is not a valid calendar date.
    /// Returns `ScheduleError::NonexistentLocalTime` if a boundary falls in a DST gap.
    pub fn window_for_date(&self, date: &str) -> Result<WeekWindow> {
        let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| {
            ScheduleError::InvalidDate {
                date: date.to_string(),
                reason: e.to_string(),
            }
        })?;

        self.window_for_naive_date(parsed)
    }

    /// Compute the window for a local calendar date in the calculator's zone.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidDate` if the week reaches past the range
    /// `NaiveDate` can represent.
    pub fn window_for_naive_date(&self, date: NaiveDate) -> Result<WeekWindow> {
        let out_of_range = || ScheduleError::InvalidDate {
            date: date.format(DATE_FORMAT).to_string(),
            reason: "out of range".to_string(),
        };
        let start_date = date
            .checked_sub_days(Days::new(self.days_since_week_start(date.weekday())))
            .ok_or_else(out_of_range)?;
        let next_start_date = start_date
            .checked_add_days(Days::new(7))
            .ok_or_else(out_of_range)?;

        let start = self.local_instant(start_date.and_time(self.start_time))?;
        let next_start = self.local_instant(next_start_date.and_time(self.start_time))?;

        Ok(WeekWindow::new(start, next_start - Duration::milliseconds(1)))
    }

    /// Compute the window that contains `at`.
    ///
    /// Unlike [`window_for_date`](Self::window_for_date), this honours the time of
    /// day: 01:00 on a Tuesday still belongs to the week that started the Tuesday
    /// before.
    pub fn window_containing(&self, at: DateTime<Utc>) -> Result<WeekWindow> {
        let local_date = at.with_timezone(&self.timezone).date_naive();
        let window = self.window_for_naive_date(local_date)?;
        if at < window.start {
            let previous = local_date
                .pred_opt()
                .ok_or_else(|| ScheduleError::InvalidDate {
                    date: local_date.format(DATE_FORMAT).to_string(),
                    reason: "out of range".to_string(),
                })?;
            return self.window_for_naive_date(previous);
        }
        Ok(window)
    }

    /// Days between the most recent start weekday and `weekday` (0 on the start day).
    fn days_since_week_start(&self, weekday: Weekday) -> u64 {
        let from = self.start_weekday.num_days_from_monday();
        let to = weekday.num_days_from_monday();
        u64::from((7 + to - from) % 7)
    }

    /// Resolve a local wall-clock time. Ambiguous times (DST fall back) take the
    /// earlier instant; nonexistent ones (spring forward) are an error.
    fn local_instant(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        self.timezone
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(ScheduleError::NonexistentLocalTime(local))
    }
}

/// Compute the standard Tuesday 03:00 Eastern window for a `YYYY-MM-DD` date.
pub fn week_window(date: &str) -> Result<WeekWindow> {
    WindowCalculator::default().window_for_date(date)
}
