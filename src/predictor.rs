use crate::model::{Fixture, Prediction, Scenario};

/// The one contract every strategy shares. Anything implementing it can be evaluated or voted.
pub trait Predictor: Send + Sync {
    fn predict(&self, fixture: &Fixture) -> Prediction;
}

/// Predictors that can forecast from a partially played match.
pub trait InProgressPredictor: Predictor {
    fn predict_in_progress(&self, fixture: &Fixture, scenario: &Scenario) -> Prediction;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        (**self).predict(fixture)
    }
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        (**self).predict(fixture)
    }
}
