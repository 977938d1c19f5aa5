use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{PredictorError, Result};
use crate::model::{Fixture, MatchResult, Outcome, Prediction, Team};
use crate::predictor::Predictor;

pub const DEFAULT_ITERATIONS: usize = 500;
pub const DEFAULT_C: f64 = 1.0;

/// One-hot team index. A fixture is encoded as `onehot(home) ++ onehot(away)`.
#[derive(Debug, Clone, Default)]
pub struct TeamEncoding {
    index: HashMap<String, usize>,
}

impl TeamEncoding {
    pub fn fit<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Self {
        let names: BTreeSet<&str> = results
            .into_iter()
            .flat_map(|r| {
                let f = r.fixture();
                [f.home_team.name.as_str(), f.away_team.name.as_str()]
            })
            .collect();
        let index = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        Self { index }
    }

    pub fn encode(&self, team: &Team) -> Option<usize> {
        self.index.get(&team.name).copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Active feature columns for a known fixture.
    fn columns(&self, home: usize, away: usize) -> [usize; 2] {
        [home, self.len() + away]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegressionParams {
    pub iterations: usize,
    /// Inverse L2 strength, as in the usual `0.5 * |w|^2 + C * sum(log_loss)` objective.
    pub c: f64,
}

impl RegressionParams {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(PredictorError::InvalidConfig {
                key: "regression_iterations",
                value: self.iterations.to_string(),
            });
        }
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(PredictorError::InvalidConfig {
                key: "regression_c",
                value: self.c.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RegressionParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            c: DEFAULT_C,
        }
    }
}

/// One-vs-rest logistic regression over team identities, no intercept.
#[derive(Debug, Clone)]
pub struct LogisticRegressionPredictor {
    encoding: TeamEncoding,
    // One weight vector per outcome seen in training, in `Outcome::ALL` order.
    models: Vec<(Outcome, Vec<f64>)>,
}

impl LogisticRegressionPredictor {
    pub fn encoding(&self) -> &TeamEncoding {
        &self.encoding
    }

    pub fn decision(&self, outcome: Outcome, fixture: &Fixture) -> Option<f64> {
        let home = self.encoding.encode(&fixture.home_team)?;
        let away = self.encoding.encode(&fixture.away_team)?;
        let cols = self.encoding.columns(home, away);
        self.models
            .iter()
            .find(|(o, _)| *o == outcome)
            .map(|(_, w)| w[cols[0]] + w[cols[1]])
    }
}

impl Predictor for LogisticRegressionPredictor {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        let home = self.encoding.encode(&fixture.home_team);
        let away = self.encoding.encode(&fixture.away_team);
        let (home, away) = match (home, away) {
            (Some(h), Some(a)) => (h, a),
            (None, Some(_)) => return Prediction::new(Outcome::Away),
            (Some(_), None) => return Prediction::new(Outcome::Home),
            (None, None) => return Prediction::new(Outcome::Draw),
        };

        let cols = self.encoding.columns(home, away);
        let mut best: Option<(Outcome, f64)> = None;
        for (outcome, w) in &self.models {
            let score = w[cols[0]] + w[cols[1]];
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((*outcome, score));
            }
        }
        Prediction::new(best.map_or(Outcome::Draw, |(o, _)| o))
    }
}

pub fn train_regression_predictor(results: &[MatchResult]) -> Result<LogisticRegressionPredictor> {
    train_regression_predictor_with(results, RegressionParams::default())
}

pub fn train_regression_predictor_with(
    results: &[MatchResult],
    params: RegressionParams,
) -> Result<LogisticRegressionPredictor> {
    params.validate()?;
    if results.is_empty() {
        return Err(PredictorError::EmptyHistory {
            predictor: "logistic regression predictor",
        });
    }

    let encoding = TeamEncoding::fit(results);
    let rows: Vec<([usize; 2], Outcome)> = results
        .iter()
        .filter_map(|r| {
            let f = r.fixture();
            let h = encoding.encode(&f.home_team)?;
            let a = encoding.encode(&f.away_team)?;
            Some((encoding.columns(h, a), r.outcome()))
        })
        .collect();

    let features = encoding.len() * 2;
    let mut column_counts = vec![0usize; features];
    for (cols, _) in &rows {
        column_counts[cols[0]] += 1;
        column_counts[cols[1]] += 1;
    }
    let max_count = column_counts.iter().copied().max().unwrap_or(0) as f64;
    // Each row has two active unit features, so the Hessian of the data term is bounded
    // by 0.25 * 2 * max_count (Gershgorin); 1 / L keeps plain gradient descent stable.
    let step = 1.0 / (1.0 + 0.5 * params.c * max_count);

    let models: Vec<(Outcome, Vec<f64>)> = Outcome::ALL
        .iter()
        .copied()
        .filter(|class| rows.iter().any(|(_, o)| o == class))
        .map(|class| (class, fit_binary(&rows, class, features, params, step)))
        .collect();

    debug!(
        results = results.len(),
        teams = encoding.len(),
        classes = models.len(),
        "trained logistic regression predictor"
    );

    Ok(LogisticRegressionPredictor { encoding, models })
}

fn fit_binary(
    rows: &[([usize; 2], Outcome)],
    class: Outcome,
    features: usize,
    params: RegressionParams,
    step: f64,
) -> Vec<f64> {
    let mut w = vec![0.0_f64; features];
    let mut grad = vec![0.0_f64; features];

    for _ in 0..params.iterations {
        grad.copy_from_slice(&w);
        for (cols, outcome) in rows {
            let target = if *outcome == class { 1.0 } else { 0.0 };
            let residual = params.c * (sigmoid(w[cols[0]] + w[cols[1]]) - target);
            grad[cols[0]] += residual;
            grad[cols[1]] += residual;
        }
        for (wi, gi) in w.iter_mut().zip(&grad) {
            *wi -= step * gi;
        }
    }
    w
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(home: &str, away: &str, hg: u8, ag: u8) -> MatchResult {
        MatchResult::new(Fixture::between(home, away), hg, ag)
    }

    fn dominant_history() -> Vec<MatchResult> {
        let mut out = Vec::new();
        for _ in 0..6 {
            out.push(result("Strong", "Weak", 3, 0));
            out.push(result("Weak", "Strong", 0, 2));
            out.push(result("Strong", "Mid", 2, 0));
            out.push(result("Mid", "Weak", 1, 1));
        }
        out
    }

    #[test]
    fn learns_the_stronger_side() {
        let p = train_regression_predictor(&dominant_history()).unwrap();
        assert_eq!(p.predict(&Fixture::between("Strong", "Weak")).outcome, Outcome::Home);
        assert_eq!(p.predict(&Fixture::between("Weak", "Strong")).outcome, Outcome::Away);
    }

    #[test]
    fn unknown_teams_degrade_by_side() {
        let p = train_regression_predictor(&dominant_history()).unwrap();
        assert_eq!(p.predict(&Fixture::between("Unknown", "Weak")).outcome, Outcome::Away);
        assert_eq!(p.predict(&Fixture::between("Strong", "Unknown")).outcome, Outcome::Home);
        assert_eq!(p.predict(&Fixture::between("Nobody", "Unknown")).outcome, Outcome::Draw);
    }

    #[test]
    fn single_class_history_predicts_that_class() {
        let p = train_regression_predictor(&[result("A", "B", 1, 1), result("B", "A", 0, 0)])
            .unwrap();
        assert_eq!(p.predict(&Fixture::between("A", "B")).outcome, Outcome::Draw);
        assert!(p.decision(Outcome::Home, &Fixture::between("A", "B")).is_none());
    }

    #[test]
    fn encoding_is_sorted_and_stable() {
        let enc = TeamEncoding::fit(&[result("Celtic", "Aberdeen", 1, 0)]);
        assert_eq!(enc.encode(&Team::new("Aberdeen")), Some(0));
        assert_eq!(enc.encode(&Team::new("Celtic")), Some(1));
        assert_eq!(enc.encode(&Team::new("Hearts")), None);
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(train_regression_predictor(&[]).is_err());
    }

    #[test]
    fn invalid_params_fail_before_training() {
        let history = dominant_history();
        for c in [f64::NAN, f64::INFINITY, -0.1667, 0.0] {
            let params = RegressionParams {
                c,
                ..RegressionParams::default()
            };
            assert!(matches!(
                train_regression_predictor_with(&history, params),
                Err(PredictorError::InvalidConfig { key: "regression_c", .. })
            ));
        }
        let params = RegressionParams {
            iterations: 0,
            ..RegressionParams::default()
        };
        assert_eq!(
            train_regression_predictor_with(&history, params).unwrap_err(),
            PredictorError::InvalidConfig {
                key: "regression_iterations",
                value: "0".to_string(),
            }
        );
    }
}
