use std::collections::HashMap;

use rayon::prelude::*;

use crate::model::{Fixture, MatchResult, Outcome};

/// Everything the advanced table tracks for one team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRecord {
    pub points: u32,
    pub goal_diff: i32,
    /// Sum of +1/-1/0 over every game, no window.
    pub recent_form: i32,
    pub home_form: f64,
    pub away_form: f64,
    /// Signed running tally against each opponent, from this team's side.
    pub head_to_head: HashMap<String, f64>,
}

impl TeamRecord {
    fn merge(&mut self, other: TeamRecord) {
        self.points += other.points;
        self.goal_diff += other.goal_diff;
        self.recent_form += other.recent_form;
        self.home_form += other.home_form;
        self.away_form += other.away_form;
        for (opponent, tally) in other.head_to_head {
            *self.head_to_head.entry(opponent).or_insert(0.0) += tally;
        }
    }
}

/// Per-team points, goal difference, form and head-to-head, built by replaying results.
///
/// Every field is an additive sum, so the final table does not depend on replay order.
/// Lookups for teams with no history return zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedPointsTable {
    teams: HashMap<String, TeamRecord>,
}

// Increments one event applies to the home and away side.
struct Swing {
    points: u32,
    form: i32,
}

impl AdvancedPointsTable {
    pub fn team_record(&self, team: &str) -> Option<&TeamRecord> {
        self.teams.get(team)
    }

    pub fn teams(&self) -> usize {
        self.teams.len()
    }

    pub fn points_for(&self, team: &str) -> u32 {
        self.teams.get(team).map_or(0, |r| r.points)
    }

    pub fn goal_diff_for(&self, team: &str) -> i32 {
        self.teams.get(team).map_or(0, |r| r.goal_diff)
    }

    pub fn recent_form_for(&self, team: &str) -> i32 {
        self.teams.get(team).map_or(0, |r| r.recent_form)
    }

    pub fn home_form_for(&self, team: &str) -> f64 {
        self.teams.get(team).map_or(0.0, |r| r.home_form)
    }

    pub fn away_form_for(&self, team: &str) -> f64 {
        self.teams.get(team).map_or(0.0, |r| r.away_form)
    }

    pub fn head_to_head_for(&self, team: &str, opponent: &str) -> f64 {
        self.teams
            .get(team)
            .and_then(|r| r.head_to_head.get(opponent))
            .copied()
            .unwrap_or(0.0)
    }

    /// Applies all six updates for one finished fixture.
    pub fn record_result(
        &mut self,
        fixture: &Fixture,
        outcome: Outcome,
        home_goals: u8,
        away_goals: u8,
    ) {
        let (home_swing, away_swing) = match outcome {
            Outcome::Home => (Swing { points: 3, form: 1 }, Swing { points: 0, form: -1 }),
            Outcome::Away => (Swing { points: 0, form: -1 }, Swing { points: 3, form: 1 }),
            Outcome::Draw => (Swing { points: 1, form: 0 }, Swing { points: 1, form: 0 }),
        };
        let margin = i32::from(home_goals) - i32::from(away_goals);
        let home_name = &fixture.home_team.name;
        let away_name = &fixture.away_team.name;

        let home = self.teams.entry(home_name.clone()).or_default();
        home.points += home_swing.points;
        home.goal_diff += margin;
        home.recent_form += home_swing.form;
        home.home_form += f64::from(home_swing.form);
        *home.head_to_head.entry(away_name.clone()).or_insert(0.0) += f64::from(home_swing.form);

        let away = self.teams.entry(away_name.clone()).or_default();
        away.points += away_swing.points;
        away.goal_diff -= margin;
        away.recent_form += away_swing.form;
        away.away_form += f64::from(away_swing.form);
        *away.head_to_head.entry(home_name.clone()).or_insert(0.0) += f64::from(away_swing.form);
    }

    pub fn record(&mut self, result: &MatchResult) {
        self.record_result(
            result.fixture(),
            result.outcome(),
            result.home_goals(),
            result.away_goals(),
        );
    }

    /// Adds another table's sums into this one.
    pub fn merge(mut self, other: AdvancedPointsTable) -> Self {
        for (team, record) in other.teams {
            self.teams.entry(team).or_default().merge(record);
        }
        self
    }
}

pub fn calculate_advanced_table<'a>(
    results: impl IntoIterator<Item = &'a MatchResult>,
) -> AdvancedPointsTable {
    results
        .into_iter()
        .fold(AdvancedPointsTable::default(), |mut table, result| {
            table.record(result);
            table
        })
}

/// Same table as [`calculate_advanced_table`], folded per rayon split and merged.
pub fn calculate_advanced_table_parallel(results: &[MatchResult]) -> AdvancedPointsTable {
    results
        .par_iter()
        .fold(AdvancedPointsTable::default, |mut table, result| {
            table.record(result);
            table
        })
        .reduce(AdvancedPointsTable::default, AdvancedPointsTable::merge)
}
