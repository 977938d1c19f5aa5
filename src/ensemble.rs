use tracing::debug;

use crate::advanced_table::{AdvancedPointsTable, calculate_advanced_table};
use crate::error::{PredictorError, Result};
use crate::model::{Fixture, MatchResult, Outcome, Prediction};
use crate::predictor::Predictor;
use crate::regression::{RegressionParams, train_regression_predictor_with};

const POINTS_WEIGHT: f64 = 0.3;
const GOAL_DIFF_WEIGHT: f64 = 0.2;
const RECENT_FORM_WEIGHT: f64 = 0.2;
const VENUE_FORM_WEIGHT: f64 = 0.2;
const HEAD_TO_HEAD_WEIGHT: f64 = 0.1;

/// Ordered `(predictor, weight)` voters; each adds its weight to the outcome it predicts.
///
/// The outcome with the largest total wins. Equal totals resolve by [`Outcome::ALL`] order,
/// so Home beats Away beats Draw.
pub struct WeightedVote {
    voters: Vec<(Box<dyn Predictor>, f64)>,
}

impl WeightedVote {
    pub fn new(voters: Vec<(Box<dyn Predictor>, f64)>) -> Result<Self> {
        if voters.is_empty() {
            return Err(PredictorError::NoVoters);
        }
        if let Some((_, weight)) = voters.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(PredictorError::InvalidWeight { weight: *weight });
        }
        if voters.iter().all(|(_, w)| *w == 0.0) {
            return Err(PredictorError::ZeroTotalWeight);
        }
        Ok(Self { voters })
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Accumulated weight per outcome, indexed by [`Outcome::index`].
    pub fn tally(&self, fixture: &Fixture) -> [f64; 3] {
        let mut scores = [0.0_f64; 3];
        for (voter, weight) in &self.voters {
            scores[voter.predict(fixture).outcome.index()] += weight;
        }
        scores
    }
}

impl Predictor for WeightedVote {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        let scores = self.tally(fixture);
        let mut best = Outcome::ALL[0];
        for outcome in Outcome::ALL.into_iter().skip(1) {
            if scores[outcome.index()] > scores[best.index()] {
                best = outcome;
            }
        }
        Prediction::new(best)
    }
}

/// Weighted sum of table signals per side; higher score wins, equal scores draw.
#[derive(Debug, Clone)]
pub struct TableHeuristicPredictor {
    table: AdvancedPointsTable,
}

impl TableHeuristicPredictor {
    pub fn new(table: AdvancedPointsTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AdvancedPointsTable {
        &self.table
    }

    /// (home score, away score). Head-to-head is stored from the home side, so the away side
    /// takes it negated.
    pub fn scores(&self, fixture: &Fixture) -> (f64, f64) {
        let t = &self.table;
        let home = fixture.home_team.name.as_str();
        let away = fixture.away_team.name.as_str();
        let h2h = t.head_to_head_for(home, away);

        let home_score = POINTS_WEIGHT * f64::from(t.points_for(home))
            + GOAL_DIFF_WEIGHT * f64::from(t.goal_diff_for(home))
            + RECENT_FORM_WEIGHT * f64::from(t.recent_form_for(home))
            + VENUE_FORM_WEIGHT * t.home_form_for(home)
            + HEAD_TO_HEAD_WEIGHT * h2h;
        let away_score = POINTS_WEIGHT * f64::from(t.points_for(away))
            + GOAL_DIFF_WEIGHT * f64::from(t.goal_diff_for(away))
            + RECENT_FORM_WEIGHT * f64::from(t.recent_form_for(away))
            + VENUE_FORM_WEIGHT * t.away_form_for(away)
            - HEAD_TO_HEAD_WEIGHT * h2h;
        (home_score, away_score)
    }
}

impl Predictor for TableHeuristicPredictor {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        let (home, away) = self.scores(fixture);
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleWeights {
    pub heuristic: f64,
    pub statistical: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            heuristic: 0.6,
            statistical: 0.4,
        }
    }
}

/// The table heuristic and an opaque statistical predictor, combined by weighted vote.
pub struct AdvancedPredictor {
    vote: WeightedVote,
}

impl AdvancedPredictor {
    pub fn new(table: AdvancedPointsTable, statistical: Box<dyn Predictor>) -> Result<Self> {
        Self::with_weights(table, statistical, EnsembleWeights::default())
    }

    pub fn with_weights(
        table: AdvancedPointsTable,
        statistical: Box<dyn Predictor>,
        weights: EnsembleWeights,
    ) -> Result<Self> {
        let heuristic: Box<dyn Predictor> = Box::new(TableHeuristicPredictor::new(table));
        let vote = WeightedVote::new(vec![
            (heuristic, weights.heuristic),
            (statistical, weights.statistical),
        ])?;
        Ok(Self { vote })
    }
}

impl Predictor for AdvancedPredictor {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        self.vote.predict(fixture)
    }
}

pub fn train_advanced_predictor(results: &[MatchResult]) -> Result<AdvancedPredictor> {
    train_advanced_predictor_with(results, EnsembleWeights::default(), RegressionParams::default())
}

pub fn train_advanced_predictor_with(
    results: &[MatchResult],
    weights: EnsembleWeights,
    regression: RegressionParams,
) -> Result<AdvancedPredictor> {
    if results.is_empty() {
        return Err(PredictorError::EmptyHistory {
            predictor: "advanced predictor",
        });
    }
    let table = calculate_advanced_table(results);
    let statistical = train_regression_predictor_with(results, regression)?;
    debug!(
        results = results.len(),
        teams = table.teams(),
        heuristic_weight = weights.heuristic,
        statistical_weight = weights.statistical,
        "trained advanced predictor"
    );
    AdvancedPredictor::with_weights(table, Box::new(statistical), weights)
}
