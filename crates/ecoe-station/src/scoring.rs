//! Final grade computation.

use crate::checklist::ChecklistScores;
use crate::error::StationError;

/// Every station is graded out of 5.0.
pub const MAX_SCORE: f64 = 5.0;

/// Convert the finalized status map into the station grade.
///
/// `earned = Σ points(status)` over all entries (1.0 full, 0.5 partial),
/// then `score = round₁(earned / item_count × MAX_SCORE)`.
///
/// `item_count` must come from the case checklist, not the map — a case
/// with zero items is a configuration error upstream and yields
/// `EmptyChecklist` rather than a silent division by zero.
pub fn compute_score(scores: &ChecklistScores, item_count: usize) -> Result<f64, StationError> {
    if item_count == 0 {
        return Err(StationError::EmptyChecklist);
    }
    let earned = scores.earned_points();
    Ok(round_to_tenth(earned / item_count as f64 * MAX_SCORE))
}

/// Round to one decimal place, half away from zero (`f64::round`). Scores
/// are non-negative, so `.x5` boundaries round up: 2.25 → 2.3.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
