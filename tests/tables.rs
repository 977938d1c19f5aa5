use proptest::prelude::*;

use match_predictor::advanced_table::{calculate_advanced_table, calculate_advanced_table_parallel};
use match_predictor::points_table::calculate_table;
use match_predictor::{Fixture, MatchResult, Outcome, Team};

const TEAMS: &[&str] = &["Ajax", "Benfica", "Celtic", "Dortmund", "Everton", "Feyenoord"];

fn result(home: &str, away: &str, hg: u8, ag: u8) -> MatchResult {
    MatchResult::new(Fixture::between(home, away), hg, ag)
}

fn arb_result() -> impl Strategy<Value = MatchResult> {
    (0..TEAMS.len(), 1..TEAMS.len(), 0u8..6, 0u8..6).prop_map(|(h, offset, hg, ag)| {
        let a = (h + offset) % TEAMS.len();
        result(TEAMS[h], TEAMS[a], hg, ag)
    })
}

fn arb_history() -> impl Strategy<Value = Vec<MatchResult>> {
    prop::collection::vec(arb_result(), 0..60)
}

proptest! {
    #[test]
    fn advanced_table_ignores_replay_order(
        (history, shuffled) in arb_history().prop_flat_map(|h| {
            let original = h.clone();
            (Just(original), Just(h).prop_shuffle())
        })
    ) {
        prop_assert_eq!(calculate_advanced_table(&history), calculate_advanced_table(&shuffled));
    }

    #[test]
    fn parallel_table_equals_sequential(history in arb_history()) {
        prop_assert_eq!(
            calculate_advanced_table(&history),
            calculate_advanced_table_parallel(&history)
        );
    }

    #[test]
    fn points_are_conserved(history in arb_history()) {
        let table = calculate_table(&history);
        let awarded: u32 = TEAMS.iter().map(|t| table.points_for(&Team::new(*t))).sum();
        let expected: u32 = history
            .iter()
            .map(|r| if r.outcome() == Outcome::Draw { 2 } else { 3 })
            .sum();
        prop_assert_eq!(awarded, expected);

        let advanced = calculate_advanced_table(&history);
        let advanced_awarded: u32 = TEAMS.iter().map(|t| advanced.points_for(t)).sum();
        prop_assert_eq!(advanced_awarded, expected);
    }

    #[test]
    fn goal_difference_sums_to_zero(history in arb_history()) {
        let table = calculate_advanced_table(&history);
        let total: i32 = TEAMS.iter().map(|t| table.goal_diff_for(t)).sum();
        prop_assert_eq!(total, 0);
    }

    #[test]
    fn head_to_head_is_anti_symmetric(history in arb_history()) {
        // Holds for draws too: both sides receive zero.
        let table = calculate_advanced_table(&history);
        for a in TEAMS {
            for b in TEAMS {
                prop_assert_eq!(table.head_to_head_for(a, b), -table.head_to_head_for(b, a));
            }
        }
    }
}

#[test]
fn one_home_win_scenario() {
    let table = calculate_advanced_table(&[result("TeamA", "TeamB", 3, 1)]);
    assert_eq!(table.recent_form_for("TeamA"), 1);
    assert_eq!(table.recent_form_for("TeamB"), -1);
    assert_eq!(table.head_to_head_for("TeamA", "TeamB"), 1.0);
    assert_eq!(table.head_to_head_for("TeamB", "TeamA"), -1.0);

    let points = calculate_table(&[result("TeamA", "TeamB", 3, 1)]);
    assert_eq!(points.points_for(&Team::new("TeamA")), 3);
    assert_eq!(points.points_for(&Team::new("TeamB")), 0);
}

#[test]
fn mutual_history_nets_out() {
    let table = calculate_advanced_table(&[
        result("Ajax", "Celtic", 2, 0),
        result("Celtic", "Ajax", 1, 0),
        result("Ajax", "Celtic", 0, 3),
    ]);
    assert_eq!(table.head_to_head_for("Ajax", "Celtic"), -1.0);
    assert_eq!(table.head_to_head_for("Celtic", "Ajax"), 1.0);
    assert_eq!(table.home_form_for("Ajax"), 0.0);
    assert_eq!(table.away_form_for("Ajax"), -1.0);
    assert_eq!(table.home_form_for("Celtic"), 1.0);
    assert_eq!(table.away_form_for("Celtic"), 0.0);
}
