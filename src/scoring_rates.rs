use std::collections::HashMap;

use tracing::debug;

use crate::error::{PredictorError, Result};
use crate::model::{MatchResult, Team};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct GoalTally {
    games: u32,
    scored: u32,
    conceded: u32,
}

impl GoalTally {
    fn add(&mut self, scored: u8, conceded: u8) {
        self.games += 1;
        self.scored += u32::from(scored);
        self.conceded += u32::from(conceded);
    }
}

/// Average goals scored and conceded per game for every team in a fixed history.
///
/// Home and away appearances are pooled. Teams missing from the history get the league
/// average for both rates, which the simulators treat as neutral strength.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRates {
    teams: HashMap<String, GoalTally>,
    league_average: f64,
}

impl ScoringRates {
    pub fn from_results(results: &[MatchResult]) -> Result<Self> {
        if results.is_empty() {
            return Err(PredictorError::EmptyHistory {
                predictor: "scoring rates",
            });
        }

        let mut teams: HashMap<String, GoalTally> = HashMap::new();
        let mut total_goals = 0u64;
        for r in results {
            let f = r.fixture();
            teams
                .entry(f.home_team.name.clone())
                .or_default()
                .add(r.home_goals(), r.away_goals());
            teams
                .entry(f.away_team.name.clone())
                .or_default()
                .add(r.away_goals(), r.home_goals());
            total_goals += u64::from(r.home_goals()) + u64::from(r.away_goals());
        }

        // Goals per team per game.
        let league_average = total_goals as f64 / (2 * results.len()) as f64;
        debug!(
            results = results.len(),
            teams = teams.len(),
            league_average,
            "computed scoring rates"
        );
        Ok(Self {
            teams,
            league_average,
        })
    }

    pub fn league_average(&self) -> f64 {
        self.league_average
    }

    pub fn games_for(&self, team: &Team) -> u32 {
        self.teams.get(&team.name).map_or(0, |t| t.games)
    }

    /// Average goals scored per game.
    pub fn offense_rate(&self, team: &Team) -> f64 {
        match self.teams.get(&team.name) {
            Some(t) if t.games > 0 => f64::from(t.scored) / f64::from(t.games),
            _ => self.league_average,
        }
    }

    /// Average goals conceded per game.
    pub fn defense_rate(&self, team: &Team) -> f64 {
        match self.teams.get(&team.name) {
            Some(t) if t.games > 0 => f64::from(t.conceded) / f64::from(t.games),
            _ => self.league_average,
        }
    }

    /// Goals `attacker` is expected to score against `defender` over a full match.
    ///
    /// Scales the attacker's rate by how leaky the defender is relative to the league, so a
    /// defender conceding exactly the league average leaves the offense rate unchanged.
    pub fn expected_goals(&self, attacker: &Team, defender: &Team) -> f64 {
        let offense = self.offense_rate(attacker);
        if self.league_average <= 0.0 {
            return offense;
        }
        offense * self.defense_rate(defender) / self.league_average
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fixture;

    fn result(home: &str, away: &str, hg: u8, ag: u8) -> MatchResult {
        MatchResult::new(Fixture::between(home, away), hg, ag)
    }

    #[test]
    fn rates_pool_home_and_away_games() {
        let rates = ScoringRates::from_results(&[result("A", "B", 3, 1), result("B", "A", 2, 0)])
            .unwrap();
        let a = Team::new("A");
        let b = Team::new("B");
        assert_eq!(rates.games_for(&a), 2);
        assert!((rates.offense_rate(&a) - 1.5).abs() < 1e-12);
        assert!((rates.defense_rate(&a) - 1.5).abs() < 1e-12);
        assert!((rates.offense_rate(&b) - 1.5).abs() < 1e-12);
        assert!((rates.league_average() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn unknown_team_is_league_average() {
        let rates = ScoringRates::from_results(&[result("A", "B", 4, 0)]).unwrap();
        let ghost = Team::new("Ghost");
        assert!((rates.offense_rate(&ghost) - 2.0).abs() < 1e-12);
        assert!((rates.defense_rate(&ghost) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn neutral_defense_reduces_to_offense() {
        let rates = ScoringRates::from_results(&[
            result("A", "B", 3, 1),
            result("C", "D", 1, 3),
            result("A", "C", 2, 2),
        ])
        .unwrap();
        let a = Team::new("A");
        let ghost = Team::new("Ghost");
        assert!((rates.expected_goals(&a, &ghost) - rates.offense_rate(&a)).abs() < 1e-12);
    }

    #[test]
    fn leakier_defense_raises_expectation() {
        let rates = ScoringRates::from_results(&[
            result("A", "Leaky", 4, 0),
            result("A", "Tight", 1, 0),
            result("Leaky", "Tight", 0, 0),
        ])
        .unwrap();
        let a = Team::new("A");
        assert!(
            rates.expected_goals(&a, &Team::new("Leaky"))
                > rates.expected_goals(&a, &Team::new("Tight"))
        );
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(ScoringRates::from_results(&[]).is_err());
    }
}
