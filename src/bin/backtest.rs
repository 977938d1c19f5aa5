use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use match_predictor::baseline::{AlphabetPredictor, HomePredictor};
use match_predictor::config::{PredictorConfig, global_config};
use match_predictor::ensemble::train_advanced_predictor_with;
use match_predictor::evaluation::{Accuracy, Evaluator};
use match_predictor::points_table::train_results_predictor;
use match_predictor::regression::train_regression_predictor_with;
use match_predictor::simulation::{
    train_offense_and_defense_predictor_from_config, train_offense_predictor_from_config,
};
use match_predictor::{InProgressPredictor, MatchResult, Predictor, Scenario};

const DEFAULT_TRAIN_FRACTION: f64 = 0.75;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = parse_path_arg(&args, "--results")
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/results.json"));
    let config = match parse_path_arg(&args, "--config") {
        Some(path) => load_config(&path)?,
        None => global_config()?.clone(),
    };
    let train_fraction = parse_f64_arg(&args, "--train-fraction")
        .unwrap_or(DEFAULT_TRAIN_FRACTION)
        .clamp(0.05, 0.95);

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read results from {}", path.display()))?;
    let results: Vec<MatchResult> = serde_json::from_str(&raw).context("invalid results json")?;
    if results.len() < 2 {
        return Err(anyhow!("need at least two results, got {}", results.len()));
    }

    let split = train_split_index(results.len(), train_fraction);
    let (training, validation) = results.split_at(split);

    println!("Backtest: {}", path.display());
    println!(
        "Training: {} results, validation: {} results",
        training.len(),
        validation.len()
    );
    println!();

    report("alphabet", &AlphabetPredictor, validation);
    report("home", &HomePredictor, validation);
    report("past results", &train_results_predictor(training)?, validation);
    report(
        "logistic regression",
        &train_regression_predictor_with(training, config.regression())?,
        validation,
    );
    report(
        "advanced",
        &train_advanced_predictor_with(training, config.weights(), config.regression())?,
        validation,
    );
    let offense = train_offense_predictor_from_config(training, &config)?;
    report("offense simulation", &offense, validation);
    let offense_defense = train_offense_and_defense_predictor_from_config(training, &config)?;
    report("offense+defense simulation", &offense_defense, validation);

    if let Some(first) = validation.first() {
        let half_time = Scenario::new(1, 0, 45);
        let p = offense_defense.predict_in_progress(first.fixture(), &half_time);
        println!();
        println!(
            "{} v {} at 1-0 after 45': {:?} ({:.1}%)",
            first.fixture().home_team,
            first.fixture().away_team,
            p.outcome,
            p.confidence.unwrap_or(0.0) * 100.0
        );
    }

    Ok(())
}

fn report(name: &str, predictor: &dyn Predictor, validation: &[MatchResult]) {
    let Accuracy {
        samples,
        correct,
        accuracy,
        mean_confidence,
    } = Evaluator::new(predictor).measure_accuracy(validation);
    match mean_confidence {
        Some(c) => println!(
            "{name:<28} {correct:>4}/{samples:<4} {:>6.1}%  (mean confidence {:.1}%)",
            accuracy * 100.0,
            c * 100.0
        ),
        None => println!(
            "{name:<28} {correct:>4}/{samples:<4} {:>6.1}%",
            accuracy * 100.0
        ),
    }
}

fn load_config(path: &Path) -> Result<PredictorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config from {}", path.display()))?;
    let config: PredictorConfig = serde_json::from_str(&raw).context("invalid config json")?;
    config.validate()?;
    Ok(config)
}

fn train_split_index(n: usize, fraction: f64) -> usize {
    if n <= 2 {
        return 1;
    }
    let idx = ((n as f64) * fraction).round() as usize;
    idx.clamp(1, n - 1)
}

/// Value of `--name=value` or `--name value`, whichever comes first. Blank values are skipped.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    let inline = format!("{name}=");
    args.iter().enumerate().find_map(|(idx, arg)| {
        let raw = match arg.strip_prefix(&inline) {
            Some(value) => value,
            None if arg == name => args.get(idx + 1)?.as_str(),
            None => return None,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn parse_path_arg(args: &[String], name: &str) -> Option<PathBuf> {
    arg_value(args, name).map(PathBuf::from)
}

fn parse_f64_arg(args: &[String], name: &str) -> Option<f64> {
    let raw = arg_value(args, name)?;
    match raw.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(arg = name, value = %raw, "ignoring non-numeric argument");
            None
        }
    }
}
