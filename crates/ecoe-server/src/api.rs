//! HTTP API for the browser frontend.
//!
//! All session mutations are POSTs that return the refreshed
//! [`SessionView`], so the frontend re-renders from one document and
//! never tracks deltas. The two generation endpoints release the session
//! lock across the model call and re-acquire it to apply the outcome,
//! keyed by the request id handed out at submission — an outcome for a
//! superseded request is logged and dropped.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use ecoe_core::models::case::Specialty;
use ecoe_core::models::student::Student;
use ecoe_export::pdf::{generate_report, report_filename};
use ecoe_station::error::StationError;
use ecoe_station::session::Screen;

use crate::state::AppState;
use crate::view::{CatalogEntry, SessionView, catalog};

// ── Request/response types ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub student: Student,
    pub specialty: Specialty,
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub item_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientScriptRequest {
    pub expanded: bool,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ── API error type ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    /// The session refused the transition.
    Rejected(StationError),
    /// Report generation failed.
    Export(String),
}

impl From<StationError> for ApiError {
    fn from(e: StationError) -> Self {
        ApiError::Rejected(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Rejected(e @ StationError::MissingStudentFields) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Rejected(e) => (StatusCode::CONFLICT, e.to_string()),
            ApiError::Export(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ── Router setup ─────────────────────────────────────────────────────────────

/// All API routes under `/api`, with permissive CORS for the local
/// frontend and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/session", get(handle_session))
        .route("/catalog", get(handle_catalog))
        .route("/session/setup", post(handle_setup))
        .route("/session/regenerate", post(handle_regenerate))
        .route("/session/cancel", post(handle_cancel))
        .route("/session/start", post(handle_start))
        .route("/session/toggle", post(handle_toggle))
        .route("/session/note", post(handle_note))
        .route("/session/patient-script", post(handle_patient_script))
        .route("/session/finish", post(handle_finish))
        .route("/session/reset", post(handle_reset))
        .route("/session/ack-notice", post(handle_ack_notice))
        .route("/session/report", get(handle_report));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn handle_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::of(&session))
}

async fn handle_catalog() -> Json<Vec<CatalogEntry>> {
    Json(catalog())
}

async fn handle_setup(
    State(state): State<AppState>,
    Json(request): Json<SetupRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let request_id = {
        let mut session = state.session.lock().await;
        session.submit_setup(request.student, request.specialty, request.topic)?
    };
    run_generation(&state, request_id).await
}

async fn handle_regenerate(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, ApiError> {
    let request_id = {
        let mut session = state.session.lock().await;
        session.regenerate()?
    };
    run_generation(&state, request_id).await
}

/// Drive one generation request to its applied outcome. The session lock
/// is not held across the model call.
async fn run_generation(
    state: &AppState,
    request_id: Uuid,
) -> Result<Json<SessionView>, ApiError> {
    let (specialty, topic) = {
        let session = state.session.lock().await;
        (session.specialty, session.topic.clone())
    };

    let outcome = ecoe_bedrock::cases::generate_case(
        &state.sdk_config,
        &state.model_id,
        specialty,
        &topic,
    )
    .await;

    let mut session = state.session.lock().await;
    let applied = match outcome {
        Ok(case) => session.apply_generated_case(request_id, case),
        Err(e) => {
            warn!(error = %e, "case generation failed");
            session.apply_generation_failure(request_id)
        }
    };
    if applied.is_err() {
        warn!(request_id = %request_id, "discarding outcome of superseded generation request");
    }
    Ok(Json(SessionView::of(&session)))
}

async fn handle_cancel(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.cancel_review()?;
    Ok(Json(SessionView::of(&session)))
}

async fn handle_start(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.start_station()?;
    Ok(Json(SessionView::of(&session)))
}

async fn handle_toggle(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.toggle_item(&request.item_id)?;
    Ok(Json(SessionView::of(&session)))
}

async fn handle_note(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.set_teacher_note(request.note)?;
    Ok(Json(SessionView::of(&session)))
}

async fn handle_patient_script(
    State(state): State<AppState>,
    Json(request): Json<PatientScriptRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.lock().await;
    session.set_patient_script_expanded(request.expanded)?;
    Ok(Json(SessionView::of(&session)))
}

async fn handle_finish(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let context = {
        let mut session = state.session.lock().await;
        session.finish_station()?
    };

    let feedback = ecoe_bedrock::cases::generate_feedback(
        &state.sdk_config,
        &state.model_id,
        &context.case,
        &context.results,
        context.teacher_note.as_deref(),
    )
    .await;

    let mut session = state.session.lock().await;
    session.apply_feedback(
        context.score,
        feedback.feedback,
        feedback.strengths,
        feedback.weaknesses,
    )?;
    Ok(Json(SessionView::of(&session)))
}

async fn handle_reset(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(SessionView::of(&session))
}

async fn handle_ack_notice(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.ack_notice();
    Json(SessionView::of(&session))
}

/// `GET /api/session/report` — the finalized evaluation as a PDF
/// download. Only available on the results screen.
async fn handle_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session.lock().await;
    let (case, evaluation) = match (&session.case, &session.evaluation) {
        (Some(case), Some(evaluation)) if session.screen == Screen::Results => (case, evaluation),
        _ => {
            return Err(ApiError::Rejected(StationError::InvalidScreen {
                expected: "results",
                actual: session.screen.name(),
            }));
        }
    };

    let bytes = generate_report(&session.student, case, evaluation)
        .map_err(|e| ApiError::Export(e.to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_filename(&session.student.name)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
