//! `survivor` CLI -- compute pool week windows, list teams, and seed or audit
//! season schedules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Week window for a calendar date (Tuesday 03:00 to Tuesday 02:59:59.999 Eastern)
//! survivor window --date 2025-02-13
//!
//! # Week window containing an instant
//! survivor window --at 2025-02-11T02:30:00-05:00
//!
//! # Team roster, sorted by shorthand
//! survivor teams
//!
//! # Replay a season plan through the validator and print the stored schedules
//! survivor seed -i season.json -o schedules.json --validate-teams
//!
//! # Check stored schedules for overlaps and double-booked teams
//! survivor audit -i schedules.json
//! ```
//!
//! Logs go to stderr and are controlled by `RUST_LOG`.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::process;
use std::sync::Arc;
use survivor_schedule::{
    audit, AddMatchupRequest, CreateScheduleRequest, InMemoryScheduleStore, MatchupDetails,
    Schedule, ScheduleConfig, ScheduleService, TeamRoster, WeekWindow, WindowCalculator,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "survivor",
    version,
    about = "Survivor pool schedule windows and matchup validation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with week boundary settings (defaults to SURVIVOR_* env vars)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the week window for a date or an instant
    #[command(group(ArgGroup::new("when").required(true).args(["date", "at"])))]
    Window {
        /// Calendar date in YYYY-MM-DD form
        #[arg(long)]
        date: Option<String>,
        /// RFC 3339 instant
        #[arg(long)]
        at: Option<String>,
    },
    /// List the NFL team roster
    Teams,
    /// Create schedules and matchups from a season plan
    Seed {
        /// Season plan JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Reject team identifiers that are not on the NFL roster
        #[arg(long)]
        validate_teams: bool,
    },
    /// Report overlapping weeks and double-booked teams in stored schedules
    Audit {
        /// Schedules JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// One week of a season plan: the schedule request plus its games.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekPlan {
    #[serde(flatten)]
    schedule: CreateScheduleRequest,
    #[serde(default)]
    matchups: Vec<MatchupDetails>,
}

#[derive(Serialize)]
struct WindowOutput {
    start: String,
    end: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let calculator = load_calculator(cli.config.as_deref())?;

    match cli.command {
        Commands::Window { date, at } => {
            let window = match (date, at) {
                (Some(date), _) => calculator
                    .window_for_date(&date)
                    .with_context(|| format!("Failed to compute window for date {date}"))?,
                (None, Some(at)) => {
                    let at: DateTime<Utc> = DateTime::parse_from_rfc3339(&at)
                        .with_context(|| format!("Invalid RFC 3339 instant: {at}"))?
                        .with_timezone(&Utc);
                    calculator.window_containing(at)?
                }
                (None, None) => unreachable!("clap requires --date or --at"),
            };
            let output = render_window(&window, &calculator);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Teams => {
            let roster = TeamRoster::nfl();
            println!("{}", serde_json::to_string_pretty(&roster.all())?);
        }
        Commands::Seed {
            input,
            output,
            validate_teams,
        } => {
            let json = read_input(input.as_deref())?;
            let plan: Vec<WeekPlan> =
                serde_json::from_str(&json).context("Failed to parse season plan")?;
            let schedules = seed(plan, calculator, validate_teams)?;
            let rendered = serde_json::to_string_pretty(&schedules)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Audit { input } => {
            let json = read_input(input.as_deref())?;
            let schedules: Vec<Schedule> =
                serde_json::from_str(&json).context("Failed to parse schedules")?;
            let findings = audit(&schedules);
            println!("{}", serde_json::to_string_pretty(&findings)?);
            if !findings.is_empty() {
                eprintln!("{} problem(s) found", findings.len());
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_calculator(path: Option<&str>) -> Result<WindowCalculator> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            ScheduleConfig::from_json(&json)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => ScheduleConfig::from_env()?,
    };
    debug!(?config, "resolved configuration");
    Ok(config.calculator()?)
}

/// Replay `plan` through a fresh in-memory store and return every stored schedule.
fn seed(
    plan: Vec<WeekPlan>,
    calculator: WindowCalculator,
    validate_teams: bool,
) -> Result<Vec<Schedule>> {
    let store = Arc::new(InMemoryScheduleStore::new());
    let mut service = ScheduleService::new(store.clone(), calculator);
    if validate_teams {
        service = service.with_roster(TeamRoster::nfl());
    }

    for week in plan {
        let label = format!("year={} week={}", week.schedule.year, week.schedule.week);
        let schedule = service
            .create_schedule(&week.schedule)
            .with_context(|| format!("Failed to create schedule ({label})"))?;

        for matchup in week.matchups {
            let teams = format!("{} vs {}", matchup.away_team, matchup.home_team);
            service
                .add_matchup(&AddMatchupRequest {
                    schedule_id: schedule.id.clone(),
                    matchup: Some(matchup),
                })
                .with_context(|| format!("Failed to add matchup {teams} ({label})"))?;
        }
    }

    info!(schedules = store.len(), "seeded season");
    Ok(store.snapshot())
}

fn render_window(window: &WeekWindow, calculator: &WindowCalculator) -> WindowOutput {
    let tz = calculator.timezone();
    WindowOutput {
        start: window
            .start_in(tz)
            .to_rfc3339_opts(SecondsFormat::Millis, false),
        end: window
            .end_in(tz)
            .to_rfc3339_opts(SecondsFormat::Millis, false),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
