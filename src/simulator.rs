use rand::RngCore;
use rand_distr::{Distribution, Poisson};

use crate::model::{Fixture, Outcome, Scenario, Team};
use crate::scoring_rates::ScoringRates;

pub const MATCH_MINUTES: u16 = 90;

/// One random trial of a match, played out from `scenario` to full time.
///
/// The caller owns the random source so trials can be seeded or split across threads.
pub trait Simulator: Send + Sync {
    fn simulate(&self, fixture: &Fixture, scenario: &Scenario, rng: &mut dyn RngCore) -> Outcome;
}

impl<F> Simulator for F
where
    F: Fn(&Fixture, &Scenario, &mut dyn RngCore) -> Outcome + Send + Sync,
{
    fn simulate(&self, fixture: &Fixture, scenario: &Scenario, rng: &mut dyn RngCore) -> Outcome {
        self(fixture, scenario, rng)
    }
}

/// Goals per side drawn from the scorer's own rate; the opponent is ignored.
#[derive(Debug, Clone)]
pub struct OffenseSimulator {
    rates: ScoringRates,
}

/// Goals per side drawn from the scorer's rate scaled by the opponent's concession rate.
#[derive(Debug, Clone)]
pub struct OffenseAndDefenseSimulator {
    rates: ScoringRates,
}

pub fn offense_simulator(rates: ScoringRates) -> OffenseSimulator {
    OffenseSimulator { rates }
}

pub fn offense_and_defense_simulator(rates: ScoringRates) -> OffenseAndDefenseSimulator {
    OffenseAndDefenseSimulator { rates }
}

impl OffenseSimulator {
    pub fn rates(&self) -> &ScoringRates {
        &self.rates
    }
}

impl OffenseAndDefenseSimulator {
    pub fn rates(&self) -> &ScoringRates {
        &self.rates
    }
}

impl Simulator for OffenseSimulator {
    fn simulate(&self, fixture: &Fixture, scenario: &Scenario, rng: &mut dyn RngCore) -> Outcome {
        let lambda_home = self.rates.offense_rate(&fixture.home_team);
        let lambda_away = self.rates.offense_rate(&fixture.away_team);
        play_out(scenario, lambda_home, lambda_away, rng)
    }
}

impl Simulator for OffenseAndDefenseSimulator {
    fn simulate(&self, fixture: &Fixture, scenario: &Scenario, rng: &mut dyn RngCore) -> Outcome {
        let (home, away): (&Team, &Team) = (&fixture.home_team, &fixture.away_team);
        let lambda_home = self.rates.expected_goals(home, away);
        let lambda_away = self.rates.expected_goals(away, home);
        play_out(scenario, lambda_home, lambda_away, rng)
    }
}

/// Share of the match still to play.
pub fn remaining_fraction(scenario: &Scenario) -> f64 {
    let left = MATCH_MINUTES.saturating_sub(scenario.minutes_elapsed);
    f64::from(left) / f64::from(MATCH_MINUTES)
}

fn play_out(
    scenario: &Scenario,
    full_match_home: f64,
    full_match_away: f64,
    rng: &mut dyn RngCore,
) -> Outcome {
    let remaining = remaining_fraction(scenario);
    let home = scenario
        .home_goals
        .saturating_add(draw_goals(full_match_home * remaining, rng));
    let away = scenario
        .away_goals
        .saturating_add(draw_goals(full_match_away * remaining, rng));
    Outcome::from_goals(home, away)
}

fn draw_goals(lambda: f64, rng: &mut dyn RngCore) -> u8 {
    if lambda <= 0.0 || !lambda.is_finite() {
        return 0;
    }
    match Poisson::new(lambda) {
        Ok(dist) => {
            let goals: f64 = dist.sample(rng);
            goals.min(f64::from(u8::MAX)) as u8
        }
        Err(_) => 0,
    }
}
