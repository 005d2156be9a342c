//! Week boundary configuration.
//!
//! Defaults reproduce the NFL convention (Tuesday 03:00, `America/New_York`).
//! Values can come from a JSON document or from `SURVIVOR_*` environment
//! variables; unset keys keep their defaults.

use std::env;

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};
use crate::window::WindowCalculator;

pub const ENV_TIMEZONE: &str = "SURVIVOR_TIMEZONE";
pub const ENV_WEEK_START_DAY: &str = "SURVIVOR_WEEK_START_DAY";
pub const ENV_WEEK_START_HOUR: &str = "SURVIVOR_WEEK_START_HOUR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleConfig {
    /// IANA zone the week boundaries are anchored to.
    pub timezone: String,
    pub week_start_day: Weekday,
    pub week_start_hour: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            week_start_day: Weekday::Tue,
            week_start_hour: 3,
        }
    }
}

impl ScheduleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        match lookup(ENV_TIMEZONE) {
            Some(tz) => config.timezone = tz.trim().to_string(),
            None => debug!("{ENV_TIMEZONE} not set, using default: {}", config.timezone),
        }

        if let Some(day) = lookup(ENV_WEEK_START_DAY) {
            config.week_start_day = day
                .trim()
                .parse::<Weekday>()
                .map_err(|_| ScheduleError::InvalidConfig {
                    key: ENV_WEEK_START_DAY.to_string(),
                    reason: format!("{day:?} is not a weekday"),
                })?;
        }

        if let Some(hour) = lookup(ENV_WEEK_START_HOUR) {
            config.week_start_hour = hour
                .trim()
                .parse::<u32>()
                .map_err(|e| ScheduleError::InvalidConfig {
                    key: ENV_WEEK_START_HOUR.to_string(),
                    reason: format!("{hour:?}: {e}"),
                })?;
        }

        info!(
            timezone = %config.timezone,
            week_start_day = %config.week_start_day,
            week_start_hour = config.week_start_hour,
            "loaded schedule configuration"
        );
        Ok(config)
    }

    /// Validate the configuration into a calculator.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTimezone` for an unknown IANA zone and
    /// `ScheduleError::InvalidConfig` for an hour outside `0..24`.
    pub fn calculator(&self) -> Result<WindowCalculator> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| ScheduleError::InvalidTimezone(self.timezone.clone()))?;
        WindowCalculator::new(tz, self.week_start_day, self.week_start_hour)
    }
}
