use serde::Serialize;

use crate::model::MatchResult;
use crate::predictor::Predictor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Accuracy {
    pub samples: usize,
    pub correct: usize,
    pub accuracy: f64,
    /// Mean reported confidence, when the predictor reports any.
    pub mean_confidence: Option<f64>,
}

/// Replays known results through a predictor and scores the hit rate.
pub struct Evaluator<'a> {
    predictor: &'a dyn Predictor,
}

impl<'a> Evaluator<'a> {
    pub fn new(predictor: &'a dyn Predictor) -> Self {
        Self { predictor }
    }

    pub fn measure_accuracy<'r>(
        &self,
        results: impl IntoIterator<Item = &'r MatchResult>,
    ) -> Accuracy {
        let mut samples = 0usize;
        let mut correct = 0usize;
        let mut confidence_sum = 0.0_f64;
        let mut confidence_n = 0usize;

        for r in results {
            let prediction = self.predictor.predict(r.fixture());
            samples += 1;
            if prediction.outcome == r.outcome() {
                correct += 1;
            }
            if let Some(c) = prediction.confidence {
                confidence_sum += c;
                confidence_n += 1;
            }
        }

        Accuracy {
            samples,
            correct,
            accuracy: if samples > 0 {
                correct as f64 / samples as f64
            } else {
                0.0
            },
            mean_confidence: (confidence_n > 0).then(|| confidence_sum / confidence_n as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::HomePredictor;
    use crate::model::Fixture;

    #[test]
    fn counts_hits() {
        let results = vec![
            MatchResult::new(Fixture::between("A", "B"), 2, 0),
            MatchResult::new(Fixture::between("B", "A"), 0, 1),
            MatchResult::new(Fixture::between("C", "D"), 1, 0),
            MatchResult::new(Fixture::between("D", "C"), 1, 1),
        ];
        let acc = Evaluator::new(&HomePredictor).measure_accuracy(&results);
        assert_eq!(acc.samples, 4);
        assert_eq!(acc.correct, 2);
        assert_eq!(acc.accuracy, 0.5);
        assert!(acc.mean_confidence.is_none());
    }

    #[test]
    fn empty_input_scores_zero() {
        let acc = Evaluator::new(&HomePredictor).measure_accuracy(&Vec::<MatchResult>::new());
        assert_eq!(acc.samples, 0);
        assert_eq!(acc.accuracy, 0.0);
    }
}
