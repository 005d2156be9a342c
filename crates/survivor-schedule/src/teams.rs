//! Team roster used to validate matchup team identifiers.
//!
//! NFL franchises rarely change, so a roster is built once and shared for the
//! lifetime of the service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::TeamId;

/// Basic identifying details of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub shorthand: String,
    pub location: String,
    pub name: String,
}

impl Team {
    pub fn new(id: &str, location: &str, name: &str) -> Self {
        Self {
            id: TeamId::from(id),
            shorthand: id.to_string(),
            location: location.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRoster {
    teams: HashMap<TeamId, Team>,
}

const NFL_TEAMS: [(&str, &str, &str); 32] = [
    ("ARI", "Arizona", "Cardinals"),
    ("ATL", "Atlanta", "Falcons"),
    ("BAL", "Baltimore", "Ravens"),
    ("BUF", "Buffalo", "Bills"),
    ("CAR", "Carolina", "Panthers"),
    ("CHI", "Chicago", "Bears"),
    ("CIN", "Cincinnati", "Bengals"),
    ("CLE", "Cleveland", "Browns"),
    ("DAL", "Dallas", "Cowboys"),
    ("DEN", "Denver", "Broncos"),
    ("DET", "Detroit", "Lions"),
    ("GB", "Green Bay", "Packers"),
    ("HOU", "Houston", "Texans"),
    ("IND", "Indianapolis", "Colts"),
    ("JAX", "Jacksonville", "Jaguars"),
    ("KC", "Kansas City", "Chiefs"),
    ("LAC", "Los Angeles", "Chargers"),
    ("LAR", "Los Angeles", "Rams"),
    ("LV", "Las Vegas", "Raiders"),
    ("MIA", "Miami", "Dolphins"),
    ("MIN", "Minnesota", "Vikings"),
    ("NE", "New England", "Patriots"),
    ("NO", "New Orleans", "Saints"),
    ("NYG", "New York", "Giants"),
    ("NYJ", "New York", "Jets"),
    ("PHI", "Philadelphia", "Eagles"),
    ("PIT", "Pittsburgh", "Steelers"),
    ("SEA", "Seattle", "Seahawks"),
    ("SF", "San Francisco", "49ers"),
    ("TB", "Tampa Bay", "Buccaneers"),
    ("TEN", "Tennessee", "Titans"),
    ("WAS", "Washington", "Commanders"),
];

impl TeamRoster {
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Self {
        Self {
            teams: teams.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    /// The 32 NFL franchises, keyed by their shorthand.
    pub fn nfl() -> Self {
        Self::new(
            NFL_TEAMS
                .iter()
                .map(|(id, location, name)| Team::new(id, location, name)),
        )
    }

    /// Parse a JSON array of teams.
    pub fn from_json(json: &str) -> Result<Self> {
        let teams: Vec<Team> = serde_json::from_str(json)?;
        Ok(Self::new(teams))
    }

    /// All teams sorted by shorthand.
    pub fn all(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.values().collect();
        teams.sort_by(|a, b| a.shorthand.cmp(&b.shorthand));
        teams
    }

    pub fn get(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn contains(&self, id: &TeamId) -> bool {
        self.teams.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
