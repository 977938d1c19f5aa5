use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team {
    pub name: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub home_team: Team,
    pub away_team: Team,
}

impl Fixture {
    pub fn new(home_team: Team, away_team: Team) -> Self {
        Self {
            home_team,
            away_team,
        }
    }

    pub fn between(home: &str, away: &str) -> Self {
        Self::new(Team::new(home), Team::new(away))
    }
}

/// Result label, always from the home team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Away,
    Draw,
}

impl Outcome {
    /// Canonical order. Every tie-break in the crate walks this array and keeps the first maximum.
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Away, Outcome::Draw];

    pub fn from_goals(home_goals: u8, away_goals: u8) -> Self {
        if home_goals > away_goals {
            Outcome::Home
        } else if home_goals < away_goals {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    pub fn index(self) -> usize {
        match self {
            Outcome::Home => 0,
            Outcome::Away => 1,
            Outcome::Draw => 2,
        }
    }
}

/// A finished match. The outcome is derived from the goals and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResultRecord", into = "ResultRecord")]
pub struct MatchResult {
    fixture: Fixture,
    home_goals: u8,
    away_goals: u8,
    outcome: Outcome,
}

impl MatchResult {
    pub fn new(fixture: Fixture, home_goals: u8, away_goals: u8) -> Self {
        Self {
            fixture,
            home_goals,
            away_goals,
            outcome: Outcome::from_goals(home_goals, away_goals),
        }
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    pub fn home_goals(&self) -> u8 {
        self.home_goals
    }

    pub fn away_goals(&self) -> u8 {
        self.away_goals
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

// Flat wire shape; the outcome is re-derived on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResultRecord {
    home: String,
    away: String,
    home_goals: u8,
    away_goals: u8,
}

impl From<ResultRecord> for MatchResult {
    fn from(r: ResultRecord) -> Self {
        MatchResult::new(Fixture::between(&r.home, &r.away), r.home_goals, r.away_goals)
    }
}

impl From<MatchResult> for ResultRecord {
    fn from(r: MatchResult) -> Self {
        ResultRecord {
            home: r.fixture.home_team.name,
            away: r.fixture.away_team.name,
            home_goals: r.home_goals,
            away_goals: r.away_goals,
        }
    }
}

/// In-progress match state used to seed simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub home_goals: u8,
    pub away_goals: u8,
    pub minutes_elapsed: u16,
}

impl Scenario {
    pub fn new(home_goals: u8, away_goals: u8, minutes_elapsed: u16) -> Self {
        Self {
            home_goals,
            away_goals,
            minutes_elapsed,
        }
    }

    pub fn kickoff() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub outcome: Outcome,
    /// Only set by predictors that estimate a probability.
    pub confidence: Option<f64>,
}

impl Prediction {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            confidence: None,
        }
    }

    pub fn with_confidence(outcome: Outcome, confidence: f64) -> Self {
        Self {
            outcome,
            confidence: Some(confidence),
        }
    }
}
