use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::PredictorConfig;
use crate::error::{PredictorError, Result};
use crate::model::{Fixture, MatchResult, Outcome, Prediction, Scenario};
use crate::predictor::{InProgressPredictor, Predictor};
use crate::scoring_rates::ScoringRates;
use crate::simulator::{Simulator, offense_and_defense_simulator, offense_simulator};

// Trials per rayon task when running in parallel.
const PARALLEL_CHUNK: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomSource {
    /// Fresh OS entropy on every prediction.
    #[default]
    Entropy,
    /// Same seed on every prediction, so identical inputs give identical output.
    Seeded(u64),
}

impl RandomSource {
    fn rng(self) -> Box<dyn RngCore> {
        match self {
            RandomSource::Entropy => Box::new(StdRng::from_entropy()),
            RandomSource::Seeded(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub home: usize,
    pub away: usize,
    pub draw: usize,
}

impl OutcomeCounts {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Home => self.home += 1,
            Outcome::Away => self.away += 1,
            Outcome::Draw => self.draw += 1,
        }
    }

    fn merge(self, other: OutcomeCounts) -> Self {
        Self {
            home: self.home + other.home,
            away: self.away + other.away,
            draw: self.draw + other.draw,
        }
    }

    pub fn total(&self) -> usize {
        self.home + self.away + self.draw
    }

    /// Plurality decision with confidence.
    ///
    /// Away only has to beat draw once home has failed to beat both; it is never compared with
    /// home again. So home 40 / away 35 / draw 25 still returns home, but home 40 / away 40 /
    /// draw 20 returns away.
    pub fn decide(&self) -> Prediction {
        let n = self.total().max(1) as f64;
        if self.home > self.away && self.home > self.draw {
            Prediction::with_confidence(Outcome::Home, self.home as f64 / n)
        } else if self.away > self.draw {
            Prediction::with_confidence(Outcome::Away, self.away as f64 / n)
        } else {
            Prediction::with_confidence(Outcome::Draw, self.draw as f64 / n)
        }
    }
}

/// Monte Carlo predictor: plays the match `simulations` times and reports the plurality.
pub struct SimulationPredictor {
    simulator: Box<dyn Simulator>,
    simulations: usize,
    random: RandomSource,
    parallel: bool,
}

impl std::fmt::Debug for SimulationPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationPredictor")
            .field("simulations", &self.simulations)
            .field("random", &self.random)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl SimulationPredictor {
    pub fn new(simulator: impl Simulator + 'static, simulations: usize) -> Result<Self> {
        if simulations == 0 {
            return Err(PredictorError::ZeroSimulations);
        }
        Ok(Self {
            simulator: Box::new(simulator),
            simulations,
            random: RandomSource::default(),
            parallel: false,
        })
    }

    pub fn with_random_source(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Raw tallies for `simulations` trials starting from `scenario`.
    pub fn run(&self, fixture: &Fixture, scenario: &Scenario) -> OutcomeCounts {
        let mut rng = self.random.rng();
        if !self.parallel || self.simulations <= PARALLEL_CHUNK {
            return self.run_trials(fixture, scenario, self.simulations, rng.as_mut());
        }

        // Seeds are drawn up front on this thread; each chunk then owns its generator.
        let chunks: Vec<(usize, u64)> = (0..self.simulations)
            .step_by(PARALLEL_CHUNK)
            .map(|start| {
                let len = PARALLEL_CHUNK.min(self.simulations - start);
                (len, rng.next_u64())
            })
            .collect();

        chunks
            .into_par_iter()
            .map(|(len, seed)| {
                let mut chunk_rng = ChaCha8Rng::seed_from_u64(seed);
                self.run_trials(fixture, scenario, len, &mut chunk_rng)
            })
            .reduce(OutcomeCounts::default, OutcomeCounts::merge)
    }

    fn run_trials(
        &self,
        fixture: &Fixture,
        scenario: &Scenario,
        trials: usize,
        rng: &mut dyn RngCore,
    ) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for _ in 0..trials {
            counts.add(self.simulator.simulate(fixture, scenario, rng));
        }
        counts
    }
}

impl Predictor for SimulationPredictor {
    fn predict(&self, fixture: &Fixture) -> Prediction {
        self.predict_in_progress(fixture, &Scenario::kickoff())
    }
}

impl InProgressPredictor for SimulationPredictor {
    fn predict_in_progress(&self, fixture: &Fixture, scenario: &Scenario) -> Prediction {
        self.run(fixture, scenario).decide()
    }
}

pub fn train_offense_predictor(
    results: &[MatchResult],
    simulations: usize,
) -> Result<SimulationPredictor> {
    let rates = ScoringRates::from_results(results)?;
    debug!(simulations, "training offense simulation predictor");
    SimulationPredictor::new(offense_simulator(rates), simulations)
}

pub fn train_offense_and_defense_predictor(
    results: &[MatchResult],
    simulations: usize,
) -> Result<SimulationPredictor> {
    let rates = ScoringRates::from_results(results)?;
    debug!(simulations, "training offense and defense simulation predictor");
    SimulationPredictor::new(offense_and_defense_simulator(rates), simulations)
}

pub fn train_offense_predictor_from_config(
    results: &[MatchResult],
    config: &PredictorConfig,
) -> Result<SimulationPredictor> {
    Ok(train_offense_predictor(results, config.simulations)?
        .with_random_source(config.random_source())
        .with_parallel(config.parallel))
}

pub fn train_offense_and_defense_predictor_from_config(
    results: &[MatchResult],
    config: &PredictorConfig,
) -> Result<SimulationPredictor> {
    Ok(train_offense_and_defense_predictor(results, config.simulations)?
        .with_random_source(config.random_source())
        .with_parallel(config.parallel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(home: usize, away: usize, draw: usize) -> OutcomeCounts {
        OutcomeCounts { home, away, draw }
    }

    #[test]
    fn home_needs_strict_plurality() {
        let p = counts(5, 3, 2).decide();
        assert_eq!(p.outcome, Outcome::Home);
        assert_eq!(p.confidence, Some(0.5));
    }

    #[test]
    fn away_only_has_to_beat_draw() {
        // home ties away, so home fails step one and away wins step two
        let p = counts(4, 4, 2).decide();
        assert_eq!(p.outcome, Outcome::Away);
        assert_eq!(p.confidence, Some(0.4));
    }

    #[test]
    fn draw_takes_the_rest() {
        assert_eq!(counts(3, 3, 3).decide().outcome, Outcome::Draw);
        assert_eq!(counts(2, 4, 4).decide().outcome, Outcome::Draw);
        assert_eq!(counts(5, 1, 5).decide().outcome, Outcome::Draw);
    }

    #[test]
    fn zero_simulations_fail_fast() {
        let sim = |_: &Fixture, _: &Scenario, _: &mut dyn RngCore| Outcome::Home;
        assert_eq!(
            SimulationPredictor::new(sim, 0).unwrap_err(),
            PredictorError::ZeroSimulations
        );
    }

    #[test]
    fn constant_simulator_is_fully_confident() {
        let sim = |_: &Fixture, _: &Scenario, _: &mut dyn RngCore| Outcome::Draw;
        let p = SimulationPredictor::new(sim, 37).unwrap();
        let pred = p.predict(&Fixture::between("A", "B"));
        assert_eq!(pred.outcome, Outcome::Draw);
        assert_eq!(pred.confidence, Some(1.0));
    }

    #[test]
    fn parallel_run_counts_every_trial() {
        let sim = |_: &Fixture, _: &Scenario, _: &mut dyn RngCore| Outcome::Away;
        let p = SimulationPredictor::new(sim, 1000)
            .unwrap()
            .with_parallel(true)
            .with_random_source(RandomSource::Seeded(1));
        let counts = p.run(&Fixture::between("A", "B"), &Scenario::kickoff());
        assert_eq!(counts.total(), 1000);
        assert_eq!(counts.away, 1000);
    }
}
