use std::env;

use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::warn;

use crate::ensemble::EnsembleWeights;
use crate::error::{PredictorError, Result};
use crate::regression::{DEFAULT_C, DEFAULT_ITERATIONS, RegressionParams};
use crate::simulation::RandomSource;

const DEFAULT_SIMULATIONS: usize = 1000;

static GLOBAL: OnceCell<PredictorConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub simulations: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub heuristic_weight: f64,
    pub statistical_weight: f64,
    pub regression_iterations: usize,
    pub regression_c: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        let weights = EnsembleWeights::default();
        Self {
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
            parallel: false,
            heuristic_weight: weights.heuristic,
            statistical_weight: weights.statistical,
            regression_iterations: DEFAULT_ITERATIONS,
            regression_c: DEFAULT_C,
        }
    }
}

impl PredictorConfig {
    /// Defaults overridden by `MATCH_*` environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            simulations: env_parse("MATCH_SIMULATIONS").unwrap_or(d.simulations),
            seed: env_parse("MATCH_SEED").or(d.seed),
            parallel: env_parse::<bool>("MATCH_PARALLEL").unwrap_or(d.parallel),
            heuristic_weight: env_parse("MATCH_HEURISTIC_WEIGHT").unwrap_or(d.heuristic_weight),
            statistical_weight: env_parse("MATCH_STATISTICAL_WEIGHT")
                .unwrap_or(d.statistical_weight),
            regression_iterations: env_parse("MATCH_REGRESSION_ITERATIONS")
                .unwrap_or(d.regression_iterations),
            regression_c: env_parse("MATCH_REGRESSION_C").unwrap_or(d.regression_c),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(PredictorError::ZeroSimulations);
        }
        for (key, weight) in [
            ("heuristic_weight", self.heuristic_weight),
            ("statistical_weight", self.statistical_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PredictorError::InvalidConfig {
                    key,
                    value: weight.to_string(),
                });
            }
        }
        if self.heuristic_weight == 0.0 && self.statistical_weight == 0.0 {
            return Err(PredictorError::ZeroTotalWeight);
        }
        self.regression().validate()
    }

    pub fn random_source(&self) -> RandomSource {
        self.seed.map_or(RandomSource::Entropy, RandomSource::Seeded)
    }

    pub fn weights(&self) -> EnsembleWeights {
        EnsembleWeights {
            heuristic: self.heuristic_weight,
            statistical: self.statistical_weight,
        }
    }

    pub fn regression(&self) -> RegressionParams {
        RegressionParams {
            iterations: self.regression_iterations,
            c: self.regression_c,
        }
    }
}

/// Environment config, read and validated once per process.
pub fn global_config() -> Result<&'static PredictorConfig> {
    GLOBAL.get_or_try_init(|| {
        let config = PredictorConfig::from_env();
        config.validate()?;
        Ok(config)
    })
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let c = PredictorConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.heuristic_weight, 0.6);
        assert_eq!(c.statistical_weight, 0.4);
        assert_eq!(c.random_source(), RandomSource::Entropy);
    }

    #[test]
    fn zero_simulations_rejected() {
        let c = PredictorConfig {
            simulations: 0,
            ..PredictorConfig::default()
        };
        assert_eq!(c.validate(), Err(PredictorError::ZeroSimulations));
    }

    #[test]
    fn negative_weight_rejected() {
        let c = PredictorConfig {
            statistical_weight: -0.1,
            ..PredictorConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(PredictorError::InvalidConfig { key: "statistical_weight", .. })
        ));
    }

    #[test]
    fn zero_total_weight_rejected() {
        let c = PredictorConfig {
            heuristic_weight: 0.0,
            statistical_weight: 0.0,
            ..PredictorConfig::default()
        };
        assert_eq!(c.validate(), Err(PredictorError::ZeroTotalWeight));

        let heuristic_only = PredictorConfig {
            statistical_weight: 0.0,
            ..PredictorConfig::default()
        };
        assert!(heuristic_only.validate().is_ok());
    }

    #[test]
    fn regression_settings_rejected() {
        let c = PredictorConfig {
            regression_c: f64::NAN,
            ..PredictorConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(PredictorError::InvalidConfig { key: "regression_c", .. })
        ));
        let c = PredictorConfig {
            regression_iterations: 0,
            ..PredictorConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(PredictorError::InvalidConfig { key: "regression_iterations", .. })
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: PredictorConfig = serde_json::from_str(r#"{"simulations": 50, "seed": 9}"#).unwrap();
        assert_eq!(c.simulations, 50);
        assert_eq!(c.random_source(), RandomSource::Seeded(9));
        assert_eq!(c.regression_iterations, DEFAULT_ITERATIONS);
    }
}
