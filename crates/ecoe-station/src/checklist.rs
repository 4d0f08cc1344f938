//! The per-session checklist status map and its toggle cycle.

use std::collections::BTreeMap;

use ecoe_core::models::case::{ChecklistItem, ClinicalCase};
use ecoe_core::models::evaluation::ChecklistStatus;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Status of every checklist item of the active case, keyed by item id.
///
/// Lookup for an id without an entry yields `ChecklistStatus::None` — that
/// default is part of the contract, not a fallback. Toggling takes the
/// `ChecklistItem` itself rather than a bare id, so the `allow_partial`
/// guard always sees the item's flag and ids outside the active case never
/// grow entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChecklistScores(BTreeMap<String, ChecklistStatus>);

impl ChecklistScores {
    /// Current status for an item id, `None` variant when absent.
    pub fn status_of(&self, item_id: &str) -> ChecklistStatus {
        self.0
            .get(item_id)
            .copied()
            .unwrap_or(ChecklistStatus::None)
    }

    /// Advance the item one step through the grading cycle and return the
    /// new status.
    ///
    /// The cycle is `none → full → partial → none`, skipping `partial`
    /// entirely for items without `allow_partial`. Only the toggled entry
    /// changes. Items with `allow_partial` false can therefore never
    /// observe `partial`.
    pub fn toggle(&mut self, item: &ChecklistItem) -> ChecklistStatus {
        let next = match self.status_of(&item.id) {
            ChecklistStatus::None => ChecklistStatus::Full,
            ChecklistStatus::Full if item.allow_partial => ChecklistStatus::Partial,
            ChecklistStatus::Full | ChecklistStatus::Partial => ChecklistStatus::None,
        };
        self.0.insert(item.id.clone(), next);
        next
    }

    /// Re-initialize for a freshly generated case: every item id of the
    /// new checklist maps to `none`, and nothing from a previous case
    /// survives.
    pub fn reset_for(&mut self, case: &ClinicalCase) {
        self.0 = case
            .checklist
            .iter()
            .map(|item| (item.id.clone(), ChecklistStatus::None))
            .collect();
    }

    /// Number of items graded something other than `none`.
    pub fn marked_count(&self) -> usize {
        self.0
            .values()
            .filter(|status| **status != ChecklistStatus::None)
            .count()
    }

    /// Sum of the point values of all entries.
    pub fn earned_points(&self) -> f64 {
        self.0.values().map(ChecklistStatus::points).sum()
    }

    /// Owned copy of the underlying map, for the evaluation snapshot.
    pub fn snapshot(&self) -> BTreeMap<String, ChecklistStatus> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.0.contains_key(item_id)
    }
}
