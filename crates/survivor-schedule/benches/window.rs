//! Benchmarks for week window calculation and matchup validation.

use std::sync::Arc;

use chrono::Duration;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use survivor_schedule::{
    week_window, AddMatchupRequest, CreateScheduleRequest, InMemoryScheduleStore, MatchupDetails,
    ScheduleService, TeamRoster, WindowCalculator,
};

fn bench_window_for_date(c: &mut Criterion) {
    c.bench_function("window_for_date", |b| {
        b.iter(|| week_window(black_box("2025-10-30")))
    });
}

fn bench_window_containing(c: &mut Criterion) {
    let calc = WindowCalculator::default();
    let at = week_window("2025-10-30").unwrap().start + Duration::hours(100);
    c.bench_function("window_containing", |b| {
        b.iter(|| calc.window_containing(black_box(at)))
    });
}

/// Fill a week with 16 games, then time the rejection of a 17th that reuses a team.
fn bench_full_week_conflict(c: &mut Criterion) {
    let svc = ScheduleService::new(
        Arc::new(InMemoryScheduleStore::new()),
        WindowCalculator::default(),
    );
    let window = week_window("2025-09-09").unwrap();
    let schedule = svc
        .create_schedule(&CreateScheduleRequest {
            year: 2025,
            week: 2,
            date: "2025-09-09".to_string(),
            closes: window.start + Duration::days(5),
        })
        .unwrap();

    let roster = TeamRoster::nfl();
    let teams = roster.all();
    let kickoff = window.start + Duration::days(5);
    for pair in teams.chunks(2) {
        svc.add_matchup(&AddMatchupRequest {
            schedule_id: schedule.id.clone(),
            matchup: Some(MatchupDetails::new(pair[0].id.clone(), pair[1].id.clone(), kickoff)),
        })
        .unwrap();
    }

    let request = AddMatchupRequest {
        schedule_id: schedule.id.clone(),
        matchup: Some(MatchupDetails::new("WAS", "ARI", kickoff)),
    };
    c.bench_function("add_matchup_conflict_full_week", |b| {
        b.iter(|| svc.add_matchup(black_box(&request)).is_err())
    });
}

criterion_group!(
    benches,
    bench_window_for_date,
    bench_window_containing,
    bench_full_week_conflict
);
criterion_main!(benches);
