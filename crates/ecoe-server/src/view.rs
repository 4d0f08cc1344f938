//! Read models sent to the browser.
//!
//! The session serializes fine on its own, but the frontend also needs
//! derived values (per-item status, progress counts, the last-minute
//! flag) that live behind methods. [`SessionView`] flattens all of that
//! into one JSON document per poll.

use serde::Serialize;
use ts_rs::TS;

use ecoe_core::models::case::{ChecklistItem, ClinicalCase, Specialty};
use ecoe_core::models::evaluation::{ChecklistStatus, EvaluationState};
use ecoe_core::models::student::Student;
use ecoe_station::session::{Notice, Screen, Session};

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionView {
    pub screen: Screen,
    pub student: Student,
    pub specialty: Specialty,
    pub topic: String,
    pub case: Option<ClinicalCase>,
    /// Checklist of the active case with each item's current status.
    pub checklist: Vec<ChecklistEntry>,
    pub marked_count: usize,
    pub total_items: usize,
    pub teacher_note: String,
    pub timer: TimerView,
    pub patient_script_expanded: bool,
    pub notice: Option<NoticeView>,
    pub evaluation: Option<EvaluationState>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistEntry {
    pub item: ChecklistItem,
    pub status: ChecklistStatus,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TimerView {
    pub remaining_secs: u64,
    pub is_running: bool,
    pub last_minute: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NoticeView {
    pub kind: Notice,
    pub message: String,
}

impl SessionView {
    pub fn of(session: &Session) -> Self {
        let checklist: Vec<ChecklistEntry> = session
            .case
            .as_ref()
            .map(|case| {
                case.checklist
                    .iter()
                    .map(|item| ChecklistEntry {
                        item: item.clone(),
                        status: session.scores.status_of(&item.id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            screen: session.screen,
            student: session.student.clone(),
            specialty: session.specialty,
            topic: session.topic.clone(),
            case: session.case.clone(),
            total_items: checklist.len(),
            checklist,
            marked_count: session.scores.marked_count(),
            teacher_note: session.teacher_note.clone(),
            timer: TimerView {
                remaining_secs: session.timer.remaining_secs(),
                is_running: session.timer.is_running(),
                last_minute: session.timer.is_last_minute(),
            },
            patient_script_expanded: session.patient_script_expanded,
            notice: session.notice.map(|kind| NoticeView {
                kind,
                message: kind.message().to_string(),
            }),
            evaluation: session.evaluation.clone(),
        }
    }
}

/// One specialty with its fixed topic list, for the setup form.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogEntry {
    pub specialty: Specialty,
    pub label: String,
    pub topics: Vec<String>,
}

pub fn catalog() -> Vec<CatalogEntry> {
    Specialty::ALL
        .iter()
        .map(|&specialty| CatalogEntry {
            specialty,
            label: specialty.as_str().to_string(),
            topics: specialty.topics().iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}
