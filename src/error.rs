use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PredictorError {
    #[error("simulation count must be at least 1")]
    ZeroSimulations,
    #[error("{predictor} needs at least one historical result to train")]
    EmptyHistory { predictor: &'static str },
    #[error("ensemble weight {weight} must be finite and non-negative")]
    InvalidWeight { weight: f64 },
    #[error("weighted vote needs at least one predictor")]
    NoVoters,
    #[error("ensemble weights sum to zero")]
    ZeroTotalWeight,
    #[error("invalid config value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, PredictorError>;
