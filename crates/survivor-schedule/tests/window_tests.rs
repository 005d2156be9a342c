//! Tests for week window calculation, including DST weeks.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::America::New_York;
use survivor_schedule::error::ScheduleError;
use survivor_schedule::{week_window, WeekWindow, WindowCalculator};

/// Helper: an Eastern wall-clock time as a UTC instant.
fn eastern(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    New_York
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
        .with_timezone(&Utc)
}

fn millis(ms: i64) -> Duration {
    Duration::milliseconds(ms)
}

// ── Date normalization ──────────────────────────────────────────────────────

#[test]
fn tuesday_starts_a_new_week() {
    let window = week_window("2025-02-11").unwrap();

    assert_eq!(window.start, eastern(2025, 2, 11, 3, 0, 0));
    assert_eq!(window.end, eastern(2025, 2, 18, 3, 0, 0) - millis(1));
    assert_eq!(
        window.start_in(New_York).to_rfc3339(),
        "2025-02-11T03:00:00-05:00"
    );
    assert_eq!(
        window.end_in(New_York).to_rfc3339(),
        "2025-02-18T02:59:59.999-05:00"
    );
}

#[test]
fn thursday_belongs_to_preceding_tuesday() {
    let tuesday = week_window("2025-02-11").unwrap();
    let thursday = week_window("2025-02-13").unwrap();

    assert_eq!(thursday, tuesday);
}

#[test]
fn monday_walks_back_six_days() {
    // Monday Night Football still belongs to the week that opened the Tuesday before.
    let window = week_window("2025-02-17").unwrap();
    assert_eq!(window.start, eastern(2025, 2, 11, 3, 0, 0));
}

#[test]
fn every_day_of_a_week_maps_to_same_window() {
    let expected = week_window("2025-09-09").unwrap();
    for day in 9..=15 {
        let date = format!("2025-09-{day:02}");
        assert_eq!(week_window(&date).unwrap(), expected, "date {date}");
    }
    assert_ne!(week_window("2025-09-16").unwrap(), expected);
}

#[test]
fn standard_week_spans_seven_days_minus_one_millisecond() {
    let window = week_window("2025-02-13").unwrap();
    assert_eq!(window.end - window.start, Duration::days(7) - millis(1));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(
        week_window(" 2025-02-13 ").unwrap(),
        week_window("2025-02-13").unwrap()
    );
}

// ── DST weeks ───────────────────────────────────────────────────────────────

#[test]
fn spring_forward_week_ends_at_next_local_start() {
    // DST began Sunday 2025-03-09; the week opens in EST and closes in EDT.
    let window = week_window("2025-03-05").unwrap();

    assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 3, 4, 8, 0, 0).unwrap());
    assert_eq!(
        window.end,
        Utc.with_ymd_and_hms(2025, 3, 11, 7, 0, 0).unwrap() - millis(1)
    );
    assert_eq!(
        window.end_in(New_York).to_rfc3339(),
        "2025-03-11T02:59:59.999-04:00"
    );
}

#[test]
fn fall_back_week_ends_at_next_local_start() {
    // DST ended Sunday 2025-11-02.
    let window = week_window("2025-10-30").unwrap();

    assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 10, 28, 7, 0, 0).unwrap());
    assert_eq!(
        window.end,
        Utc.with_ymd_and_hms(2025, 11, 4, 8, 0, 0).unwrap() - millis(1)
    );
}

#[test]
fn consecutive_weeks_tile_across_dst() {
    for (this_week, next_week) in [("2025-03-05", "2025-03-12"), ("2025-10-30", "2025-11-06")] {
        let a = week_window(this_week).unwrap();
        let b = week_window(next_week).unwrap();
        assert_eq!(a.end + millis(1), b.start, "{this_week} -> {next_week}");
        assert!(!a.overlaps(&b));
    }
}

#[test]
fn dst_weeks_are_an_hour_short_or_long() {
    let spring = week_window("2025-03-05").unwrap();
    let fall = week_window("2025-10-30").unwrap();

    assert_eq!(spring.end - spring.start, Duration::hours(167) - millis(1));
    assert_eq!(fall.end - fall.start, Duration::hours(169) - millis(1));
}

// ── Invalid input ───────────────────────────────────────────────────────────

#[test]
fn malformed_date_rejected() {
    for bad in ["", "not-a-date", "2025/02/11", "2025-02-30", "2025-13-01"] {
        let err = week_window(bad).unwrap_err();
        assert!(
            matches!(err, ScheduleError::InvalidDate { ref date, .. } if date == bad),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn earliest_representable_week_is_out_of_range() {
    // Walking back to the preceding Tuesday leaves chrono's date range.
    let err = week_window("-262143-01-01").unwrap_err();
    assert!(
        matches!(err, ScheduleError::InvalidDate { ref reason, .. } if reason == "out of range"),
        "{err:?}"
    );
}

#[test]
fn latest_representable_week_is_out_of_range() {
    // The following week's start lies past `NaiveDate::MAX`.
    let err = WindowCalculator::default()
        .window_for_naive_date(NaiveDate::MAX)
        .unwrap_err();
    assert!(
        matches!(err, ScheduleError::InvalidDate { ref reason, .. } if reason == "out of range"),
        "{err:?}"
    );
}

#[test]
fn start_hour_must_be_an_hour_of_the_day() {
    let err = WindowCalculator::new(New_York, Weekday::Tue, 24).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidConfig { .. }));
}

#[test]
fn start_in_dst_gap_is_reported() {
    // 02:00 on 2025-03-09 does not exist in New York.
    let calc = WindowCalculator::new(New_York, Weekday::Sun, 2).unwrap();
    let err = calc.window_for_date("2025-03-10").unwrap_err();
    assert!(matches!(err, ScheduleError::NonexistentLocalTime(_)));
}

// ── Instants ────────────────────────────────────────────────────────────────

#[test]
fn instant_before_tuesday_start_belongs_to_previous_week() {
    let calc = WindowCalculator::default();
    let window = calc
        .window_containing(eastern(2025, 2, 11, 2, 59, 59))
        .unwrap();
    assert_eq!(window.start, eastern(2025, 2, 4, 3, 0, 0));
}

#[test]
fn instant_at_tuesday_start_opens_the_week() {
    let calc = WindowCalculator::default();
    let at = eastern(2025, 2, 11, 3, 0, 0);
    let window = calc.window_containing(at).unwrap();
    assert_eq!(window.start, at);
}

#[test]
fn window_containing_agrees_with_window_contains() {
    let calc = WindowCalculator::default();
    let window = week_window("2025-02-13").unwrap();
    for at in [window.start, window.start + Duration::hours(80), window.end] {
        assert_eq!(calc.window_containing(at).unwrap(), window);
        assert!(window.contains(at));
    }
    assert!(!window.contains(window.start - millis(1)));
    assert!(!window.contains(window.end + millis(1)));
}

// ── Custom boundaries ───────────────────────────────────────────────────────

#[test]
fn custom_week_start_in_utc() {
    let calc = WindowCalculator::new(chrono_tz::UTC, Weekday::Mon, 0).unwrap();
    let window = calc.window_for_date("2025-02-13").unwrap();

    assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap());
    assert_eq!(
        window.end,
        Utc.with_ymd_and_hms(2025, 2, 17, 0, 0, 0).unwrap() - millis(1)
    );
}

#[test]
fn overlap_is_inclusive() {
    let a = WeekWindow::new(eastern(2025, 2, 11, 3, 0, 0), eastern(2025, 2, 12, 3, 0, 0));
    let touching = WeekWindow::new(a.end, a.end + Duration::hours(1));
    let after = WeekWindow::new(a.end + millis(1), a.end + Duration::hours(1));

    assert!(a.overlaps(&touching));
    assert!(touching.overlaps(&a));
    assert!(!a.overlaps(&after));
}
