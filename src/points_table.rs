use std::collections::HashMap;

use tracing::debug;

use crate::error::{PredictorError, Result};
use crate::model::{Fixture, MatchResult, Outcome, Prediction, Team};
use crate::predictor::Predictor;

const WIN_POINTS: u32 = 3;
const DRAW_POINTS: u32 = 1;

/// League points under the 3/1/0 scheme. Unseen teams have zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsTable {
    points: HashMap<String, u32>,
}

impl PointsTable {
    pub fn points_for(&self, team: &Team) -> u32 {
        self.points.get(&team.name).copied().unwrap_or(0)
    }

    pub fn record_win(&mut self, team: &Team) {
        self.add_points(team, WIN_POINTS);
    }

    pub fn record_draw(&mut self, team: &Team) {
        self.add_points(team, DRAW_POINTS);
    }

    pub fn record(&mut self, result: &MatchResult) {
        let fixture = result.fixture();
        match result.outcome() {
            Outcome::Home => self.record_win(&fixture.home_team),
            Outcome::Away => self.record_win(&fixture.away_team),
            Outcome::Draw => {
                self.record_draw(&fixture.home_team);
                self.record_draw(&fixture.away_team);
            }
        }
    }

    pub fn teams(&self) -> usize {
        self.points.len()
    }

    fn add_points(&mut self, team: &Team, points: u32) {
        *self.points.entry(team.name.clone()).or_insert(0) += points;
    }
}

pub fn calculate_table<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> PointsTable {
    results
        .into_iter()
        .fold(PointsTable::default(), |mut table, result| {
            table.record(result);
            table
        })
}

/// Backs the team with more league points; level points is a draw.
#[derive(Debug, Clone)]
pub struct PastResultsPredictor {
    table: PointsTable,
}

impl PastResultsPredictor {
    pub fn new(table: PointsTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PointsTable {
        &self.table
    }
}

impl Predictor for PastResultsPredictor {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        let home = self.table.points_for(&fixture.home_team);
        let away = self.table.points_for(&fixture.away_team);
        let outcome = if home > away {
            Outcome::Home
        } else if home < away {
            Outcome::Away
        } else {
            Outcome::Draw
        };
        Prediction::new(outcome)
    }
}

pub fn train_results_predictor(results: &[MatchResult]) -> Result<PastResultsPredictor> {
    if results.is_empty() {
        return Err(PredictorError::EmptyHistory {
            predictor: "past results predictor",
        });
    }
    let table = calculate_table(results);
    debug!(results = results.len(), teams = table.teams(), "built points table");
    Ok(PastResultsPredictor::new(table))
}
