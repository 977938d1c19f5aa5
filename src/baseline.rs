use crate::model::{Fixture, Outcome, Prediction};
use crate::predictor::Predictor;

/// Picks the team whose name sorts first. Never predicts a draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabetPredictor;

impl Predictor for AlphabetPredictor {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        if fixture.home_team.name < fixture.away_team.name {
            Prediction::new(Outcome::Home)
        } else {
            Prediction::new(Outcome::Away)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HomePredictor;

impl Predictor for HomePredictor {
    fn predict(&self, _fixture: &Fixture) -> Prediction {
        Prediction::new(Outcome::Home)
    }
}
