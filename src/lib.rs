pub mod advanced_table;
pub mod baseline;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod points_table;
pub mod predictor;
pub mod regression;
pub mod scoring_rates;
pub mod simulation;
pub mod simulator;

pub use error::{PredictorError, Result};
pub use model::{Fixture, MatchResult, Outcome, Prediction, Scenario, Team};
pub use predictor::{InProgressPredictor, Predictor};
