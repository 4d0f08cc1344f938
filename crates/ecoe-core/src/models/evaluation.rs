//! Grading vocabulary: per-item status and the finalized evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Grading state of a single checklist item.
///
/// `Partial` is only reachable for items with `allow_partial` set; the
/// toggle logic in `ecoe-station` enforces that structurally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ChecklistStatus {
    #[default]
    None,
    Partial,
    Full,
}

impl ChecklistStatus {
    /// Points this status contributes to the earned total.
    pub fn points(&self) -> f64 {
        match self {
            ChecklistStatus::Full => 1.0,
            ChecklistStatus::Partial => 0.5,
            ChecklistStatus::None => 0.0,
        }
    }
}

/// The finalized result of a station. Created exactly once when the
/// instructor finishes the station; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EvaluationState {
    /// Snapshot of the checklist status map at finish time, by item id.
    pub checklist: BTreeMap<String, ChecklistStatus>,
    pub score: f64,
    pub max_score: f64,
    /// AI narrative feedback; empty when the feedback call degraded.
    pub feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_note: Option<String>,
    pub finished_at: jiff::Timestamp,
}
