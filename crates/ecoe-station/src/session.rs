//! The session state machine.
//!
//! One session per process, owned by the server behind a mutex. Every
//! transition is a method on [`Session`] so the flow is testable without
//! a network or a clock. The screens cycle
//! `setup → loading(generation) → review → station → loading(feedback) →
//! results → setup`, with escapes back to `setup` on generation failure
//! or review cancel, and `review → loading(generation)` on regenerate.
//!
//! AI calls happen outside the machine: a transition that needs one hands
//! back a request id (generation) or a snapshot ([`FinishContext`]), and
//! the caller applies the outcome through `apply_*`. Generation outcomes
//! carry the request id back so a response that arrives after the session
//! moved on is discarded instead of clobbering the new state.

use ecoe_core::models::case::{ClinicalCase, Specialty};
use ecoe_core::models::evaluation::{ChecklistStatus, EvaluationState};
use ecoe_core::models::student::Student;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;
use uuid::Uuid;

use crate::checklist::ChecklistScores;
use crate::error::StationError;
use crate::scoring::{self, MAX_SCORE};
use crate::timer::{CountdownTimer, TimerEvent};

/// Which AI call a loading screen is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LoadingPhase {
    Generation,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Screen {
    Setup,
    Loading(LoadingPhase),
    Review,
    Station,
    Results,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Setup => "setup",
            Screen::Loading(_) => "loading",
            Screen::Review => "review",
            Screen::Station => "station",
            Screen::Results => "results",
        }
    }
}

/// Blocking operator notices. Each requires operator action and is cleared
/// by an explicit acknowledgement, never by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Notice {
    MissingStudentFields,
    GenerationFailed,
    TimeUp,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::MissingStudentFields => "Por favor complete los datos del estudiante.",
            Notice::GenerationFailed => "Error al generar el caso. Verifique sus credenciales.",
            Notice::TimeUp => "¡Tiempo Terminado! Inicie retroalimentación.",
        }
    }
}

/// Everything the feedback call needs, snapshotted when the station is
/// finished so the session can move to the loading screen without holding
/// borrows across the await.
#[derive(Debug, Clone)]
pub struct FinishContext {
    pub score: f64,
    pub case: ClinicalCase,
    pub results: BTreeMap<String, ChecklistStatus>,
    pub teacher_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub screen: Screen,
    pub student: Student,
    pub specialty: Specialty,
    pub topic: String,
    pub case: Option<ClinicalCase>,
    pub scores: ChecklistScores,
    pub teacher_note: String,
    pub evaluation: Option<EvaluationState>,
    pub timer: CountdownTimer,
    pub patient_script_expanded: bool,
    pub notice: Option<Notice>,
    /// Id of the in-flight generation request, if any. Outcomes carrying
    /// any other id are stale and rejected.
    #[serde(skip)]
    #[ts(skip)]
    generation: Option<Uuid>,
}

impl Session {
    pub fn new(station_minutes: u32) -> Self {
        let specialty = Specialty::MedicinaInterna;
        Self {
            screen: Screen::Setup,
            student: Student::default(),
            specialty,
            topic: specialty.topics()[0].to_string(),
            case: None,
            scores: ChecklistScores::default(),
            teacher_note: String::new(),
            evaluation: None,
            timer: CountdownTimer::new(station_minutes),
            patient_script_expanded: false,
            notice: None,
            generation: None,
        }
    }

    fn expect(&self, expected: Screen) -> Result<(), StationError> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(StationError::InvalidScreen {
                expected: expected.name(),
                actual: self.screen.name(),
            })
        }
    }

    fn begin_generation(&mut self) -> Uuid {
        let request_id = Uuid::new_v4();
        self.generation = Some(request_id);
        self.screen = Screen::Loading(LoadingPhase::Generation);
        request_id
    }

    /// Store the setup form and enter `loading(generation)`.
    ///
    /// Both student fields must be non-empty — the only input validation
    /// in the system. On rejection the setup screen keeps its data and a
    /// notice is raised.
    pub fn submit_setup(
        &mut self,
        student: Student,
        specialty: Specialty,
        topic: String,
    ) -> Result<Uuid, StationError> {
        self.expect(Screen::Setup)?;
        if student.name.trim().is_empty() || student.id.trim().is_empty() {
            self.notice = Some(Notice::MissingStudentFields);
            return Err(StationError::MissingStudentFields);
        }
        self.student = student;
        self.specialty = specialty;
        self.topic = topic;
        Ok(self.begin_generation())
    }

    /// Discard the reviewed case and request a fresh one for the same
    /// student and topic.
    pub fn regenerate(&mut self) -> Result<Uuid, StationError> {
        self.expect(Screen::Review)?;
        Ok(self.begin_generation())
    }

    /// Generation succeeded: install the case, wipe all grading state from
    /// any previous case, and move to review.
    pub fn apply_generated_case(
        &mut self,
        request_id: Uuid,
        case: ClinicalCase,
    ) -> Result<(), StationError> {
        if self.generation != Some(request_id) {
            return Err(StationError::StaleResponse);
        }
        self.generation = None;
        self.scores.reset_for(&case);
        self.teacher_note.clear();
        self.evaluation = None;
        self.timer.reset();
        self.patient_script_expanded = false;
        self.case = Some(case);
        self.screen = Screen::Review;
        Ok(())
    }

    /// Generation failed: no case is retained, the operator is notified
    /// and must retrigger manually from setup.
    pub fn apply_generation_failure(&mut self, request_id: Uuid) -> Result<(), StationError> {
        if self.generation != Some(request_id) {
            return Err(StationError::StaleResponse);
        }
        self.generation = None;
        self.case = None;
        self.notice = Some(Notice::GenerationFailed);
        self.screen = Screen::Setup;
        Ok(())
    }

    /// Back out of review without running the station.
    pub fn cancel_review(&mut self) -> Result<(), StationError> {
        self.expect(Screen::Review)?;
        self.screen = Screen::Setup;
        Ok(())
    }

    /// Instructor sign-off: enter the station and start the countdown.
    pub fn start_station(&mut self) -> Result<(), StationError> {
        self.expect(Screen::Review)?;
        if self.case.is_none() {
            return Err(StationError::NoCase);
        }
        self.screen = Screen::Station;
        self.timer.start();
        Ok(())
    }

    /// Cycle the grading status of one checklist item of the active case.
    pub fn toggle_item(&mut self, item_id: &str) -> Result<ChecklistStatus, StationError> {
        self.expect(Screen::Station)?;
        let case = self.case.as_ref().ok_or(StationError::NoCase)?;
        let item = case
            .checklist
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| StationError::UnknownItem(item_id.to_string()))?
            .clone();
        Ok(self.scores.toggle(&item))
    }

    pub fn set_teacher_note(&mut self, note: String) -> Result<(), StationError> {
        self.expect(Screen::Station)?;
        self.teacher_note = note;
        Ok(())
    }

    pub fn set_patient_script_expanded(&mut self, expanded: bool) -> Result<(), StationError> {
        self.expect(Screen::Station)?;
        self.patient_script_expanded = expanded;
        Ok(())
    }

    /// Advance the countdown by one second. Only the station screen ticks;
    /// everywhere else the timer is suspended. Expiry raises the time-up
    /// notice once — it never ends the station by itself.
    pub fn tick(&mut self) {
        if self.screen != Screen::Station {
            return;
        }
        if let Some(TimerEvent::Expired) = self.timer.tick() {
            self.notice = Some(Notice::TimeUp);
        }
    }

    /// End the station: stop the countdown, compute the grade from the
    /// current status map, and enter `loading(feedback)`. Returns the
    /// snapshot the feedback call needs.
    pub fn finish_station(&mut self) -> Result<FinishContext, StationError> {
        self.expect(Screen::Station)?;
        let case = self.case.as_ref().ok_or(StationError::NoCase)?;
        self.timer.stop();
        let score = scoring::compute_score(&self.scores, case.checklist.len())?;
        let context = FinishContext {
            score,
            case: case.clone(),
            results: self.scores.snapshot(),
            teacher_note: if self.teacher_note.trim().is_empty() {
                None
            } else {
                Some(self.teacher_note.clone())
            },
        };
        self.screen = Screen::Loading(LoadingPhase::Feedback);
        Ok(context)
    }

    /// Finalize the evaluation and land on results. Always called, even
    /// when the feedback call degraded to the placeholder — the flow never
    /// stalls in `loading(feedback)`.
    pub fn apply_feedback(
        &mut self,
        score: f64,
        feedback: String,
        strengths: Vec<String>,
        weaknesses: Vec<String>,
    ) -> Result<(), StationError> {
        self.expect(Screen::Loading(LoadingPhase::Feedback))?;
        self.evaluation = Some(EvaluationState {
            checklist: self.scores.snapshot(),
            score,
            max_score: MAX_SCORE,
            feedback,
            strengths,
            weaknesses,
            teacher_note: if self.teacher_note.trim().is_empty() {
                None
            } else {
                Some(self.teacher_note.clone())
            },
            finished_at: jiff::Timestamp::now(),
        });
        self.screen = Screen::Results;
        Ok(())
    }

    /// Full reset for a new evaluation. Nothing survives: identity, case,
    /// status map, note, and result all return to their defaults.
    pub fn reset(&mut self) {
        *self = Session::new(self.timer.duration_minutes());
    }

    /// Operator acknowledged the blocking notice.
    pub fn ack_notice(&mut self) {
        self.notice = None;
    }
}
