//! Scoring properties, including the documented rounding behavior.

mod common;

use common::{case_with, item};
use ecoe_station::checklist::ChecklistScores;
use ecoe_station::error::StationError;
use ecoe_station::scoring::{MAX_SCORE, compute_score};

/// Build a scores map over `n` items with the given number graded full and
/// partial (the rest stay none).
fn graded(n: usize, full: usize, partial: usize) -> ChecklistScores {
    assert!(full + partial <= n);
    let items: Vec<_> = (0..n).map(|i| item(&format!("item-{i}"), true)).collect();
    let case = case_with(items);
    let mut scores = ChecklistScores::default();
    scores.reset_for(&case);
    for checklist_item in case.checklist.iter().take(full) {
        scores.toggle(checklist_item); // full
    }
    for checklist_item in case.checklist.iter().skip(full).take(partial) {
        scores.toggle(checklist_item); // full
        scores.toggle(checklist_item); // partial
    }
    scores
}

#[test]
fn six_full_two_partial_of_ten_scores_three_point_five() {
    let scores = graded(10, 6, 2);
    // earned = 6*1 + 2*0.5 = 7.0 → 7/10 * 5 = 3.5
    assert_eq!(compute_score(&scores, 10).unwrap(), 3.5);
}

#[test]
fn all_full_is_the_maximum() {
    let scores = graded(4, 4, 0);
    assert_eq!(compute_score(&scores, 4).unwrap(), MAX_SCORE);
}

#[test]
fn all_none_is_zero() {
    let scores = graded(4, 0, 0);
    assert_eq!(compute_score(&scores, 4).unwrap(), 0.0);
}

#[test]
fn scoring_is_deterministic() {
    let scores = graded(10, 3, 4);
    let first = compute_score(&scores, 10).unwrap();
    let second = compute_score(&scores, 10).unwrap();
    assert_eq!(first, second);
}

#[test]
fn half_boundaries_round_up() {
    // 9 partial of 10: earned = 4.5 → 4.5/10 * 5 = 2.25 → 2.3
    let scores = graded(10, 0, 9);
    assert_eq!(compute_score(&scores, 10).unwrap(), 2.3);
}

#[test]
fn result_stays_within_bounds() {
    for full in 0..=8 {
        let scores = graded(8, full, 0);
        let score = compute_score(&scores, 8).unwrap();
        assert!((0.0..=MAX_SCORE).contains(&score));
    }
}

#[test]
fn zero_items_is_a_configuration_error() {
    let scores = ChecklistScores::default();
    assert!(matches!(
        compute_score(&scores, 0),
        Err(StationError::EmptyChecklist)
    ));
}
