//! Tests for week boundary configuration and the team roster.

use std::collections::HashMap;

use chrono::{TimeZone, Utc, Weekday};
use survivor_schedule::config::{ENV_TIMEZONE, ENV_WEEK_START_DAY, ENV_WEEK_START_HOUR};
use survivor_schedule::error::ScheduleError;
use survivor_schedule::{ScheduleConfig, TeamId, TeamRoster, WindowCalculator};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

// ── Configuration ───────────────────────────────────────────────────────────

#[test]
fn defaults_match_nfl_week() {
    let config = ScheduleConfig::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config, ScheduleConfig::default());
    assert_eq!(config.calculator().unwrap(), WindowCalculator::default());
}

#[test]
fn environment_overrides_are_applied() {
    let config = ScheduleConfig::from_lookup(lookup(&[
        (ENV_TIMEZONE, "UTC"),
        (ENV_WEEK_START_DAY, "Mon"),
        (ENV_WEEK_START_HOUR, " 6 "),
    ]))
    .unwrap();

    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.week_start_day, Weekday::Mon);
    assert_eq!(config.week_start_hour, 6);

    let window = config.calculator().unwrap().window_for_date("2025-02-13").unwrap();
    assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 2, 10, 6, 0, 0).unwrap());
}

#[test]
fn malformed_environment_values_rejected() {
    let err = ScheduleConfig::from_lookup(lookup(&[(ENV_WEEK_START_DAY, "someday")])).unwrap_err();
    assert!(
        matches!(err, ScheduleError::InvalidConfig { ref key, .. } if key == ENV_WEEK_START_DAY)
    );

    let err = ScheduleConfig::from_lookup(lookup(&[(ENV_WEEK_START_HOUR, "three")])).unwrap_err();
    assert!(
        matches!(err, ScheduleError::InvalidConfig { ref key, .. } if key == ENV_WEEK_START_HOUR)
    );
}

#[test]
fn unknown_timezone_rejected_by_calculator() {
    let config = ScheduleConfig {
        timezone: "Mars/Olympus_Mons".to_string(),
        ..ScheduleConfig::default()
    };
    let err = config.calculator().unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidTimezone(ref tz) if tz == "Mars/Olympus_Mons"));
}

#[test]
fn json_config_fills_missing_keys_with_defaults() {
    let config = ScheduleConfig::from_json(r#"{"weekStartHour": 4}"#).unwrap();

    assert_eq!(config.timezone, "America/New_York");
    assert_eq!(config.week_start_day, Weekday::Tue);
    assert_eq!(config.week_start_hour, 4);
}

#[test]
fn json_config_parse_error() {
    let err = ScheduleConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, ScheduleError::JsonParse(_)));
}

#[test]
fn out_of_range_hour_rejected_by_calculator() {
    let config = ScheduleConfig {
        week_start_hour: 25,
        ..ScheduleConfig::default()
    };
    assert!(matches!(
        config.calculator(),
        Err(ScheduleError::InvalidConfig { .. })
    ));
}

// ── Roster ──────────────────────────────────────────────────────────────────

#[test]
fn nfl_roster_has_32_teams_sorted_by_shorthand() {
    let roster = TeamRoster::nfl();
    let all = roster.all();

    assert_eq!(all.len(), 32);
    assert_eq!(all.first().unwrap().shorthand, "ARI");
    assert_eq!(all.last().unwrap().shorthand, "WAS");
    assert!(all.windows(2).all(|w| w[0].shorthand < w[1].shorthand));
}

#[test]
fn roster_lookup() {
    let roster = TeamRoster::nfl();

    let ne = roster.get(&TeamId::from("NE")).unwrap();
    assert_eq!(ne.location, "New England");
    assert_eq!(ne.name, "Patriots");
    assert!(roster.contains(&"NYJ".into()));
    assert!(!roster.contains(&"XYZ".into()));
}

#[test]
fn roster_from_json() {
    let roster = TeamRoster::from_json(
        r#"[{"id":"HFX","shorthand":"HFX","location":"Halifax","name":"Harbour"}]"#,
    )
    .unwrap();

    assert_eq!(roster.len(), 1);
    assert_eq!(roster.get(&"HFX".into()).unwrap().location, "Halifax");
}
