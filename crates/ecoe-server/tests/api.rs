//! Router tests that never leave the process: screen guards, catalog,
//! and the report download. Endpoints that invoke the model are only
//! exercised up to their validation step.

use aws_config::BehaviorVersion;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use tower::util::ServiceExt;

use ecoe_core::models::case::{
    Category, ChecklistItem, ClinicalCase, Specialty, StudentInstructions, TeacherGuide,
};
use ecoe_core::models::student::Student;
use ecoe_server::api::create_router;
use ecoe_server::config::EcoeConfig;
use ecoe_server::state::AppState;

fn test_state() -> AppState {
    let sdk_config = aws_config::SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .build();
    AppState::new(sdk_config, &EcoeConfig::default())
}

fn test_case() -> ClinicalCase {
    ClinicalCase {
        specialty: Specialty::Pediatria,
        topic: "Neumonía (AIEPI)".to_string(),
        student_instructions: StudentInstructions {
            context: "Consulta de urgencias pediátricas".to_string(),
            case_summary: "Lactante de 18 meses con tos y fiebre".to_string(),
            tasks: vec!["Clasifique según AIEPI".to_string()],
        },
        teacher_guide: TeacherGuide {
            identification: "Lactante de 18 meses".to_string(),
            chief_complaint: "Tos y fiebre".to_string(),
            hpi: "Dos días de tos, hoy respiración rápida".to_string(),
            ros: String::new(),
            past_medical_history: String::new(),
            physical_exam: "FR 52, tiraje subcostal".to_string(),
            vitals: "FR 52, T 38.5".to_string(),
            labs_and_imaging: String::new(),
            diagnosis: "Neumonía".to_string(),
            treatment_plan: "Amoxicilina y control en 2 días".to_string(),
        },
        standardized_patient: None,
        checklist: vec![
            ChecklistItem {
                id: "item-1".to_string(),
                text: "Cuenta la frecuencia respiratoria".to_string(),
                category: Category::ExamenFisico,
                allow_partial: false,
                partial_criteria: None,
            },
            ChecklistItem {
                id: "item-2".to_string(),
                text: "Indica amoxicilina a dosis correcta".to_string(),
                category: Category::Tratamiento,
                allow_partial: true,
                partial_criteria: Some("Fármaco correcto, dosis errónea".to_string()),
            },
        ],
    }
}

/// Drive the session to the station screen without any model calls.
async fn state_in_station() -> AppState {
    let state = test_state();
    {
        let mut session = state.session.lock().await;
        let request_id = session
            .submit_setup(
                Student {
                    name: "Ana Rojas".to_string(),
                    id: "1098765432".to_string(),
                },
                Specialty::Pediatria,
                "Neumonía (AIEPI)".to_string(),
            )
            .unwrap();
        session.apply_generated_case(request_id, test_case()).unwrap();
        session.start_station().unwrap();
    }
    state
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn router() -> Router {
    create_router(test_state())
}

#[tokio::test]
async fn fresh_session_starts_on_setup() {
    let response = router().oneshot(get("/api/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(response).await;
    assert_eq!(view["screen"], "setup");
    assert!(view["case"].is_null());
    assert_eq!(view["totalItems"], 0);
    assert_eq!(view["timer"]["isRunning"], false);
    assert_eq!(view["timer"]["remainingSecs"], 480);
}

#[tokio::test]
async fn catalog_lists_all_specialties_with_topics() {
    let response = router().oneshot(get("/api/catalog")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let catalog = body_json(response).await;
    let entries = catalog.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert!(
        entries
            .iter()
            .all(|entry| !entry["topics"].as_array().unwrap().is_empty())
    );
    assert!(
        entries
            .iter()
            .any(|entry| entry["label"] == "Cirugía General")
    );
}

#[tokio::test]
async fn setup_with_blank_student_is_unprocessable() {
    let body = serde_json::json!({
        "student": {"name": "", "id": ""},
        "specialty": "Urgencias",
        "topic": "Fibrilación ventricular"
    });
    let response = router()
        .oneshot(post("/api/session/setup", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = body_json(response).await;
    assert!(!error["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn toggle_outside_the_station_conflicts() {
    let body = serde_json::json!({"itemId": "item-1"});
    let response = router()
        .oneshot(post("/api/session/toggle", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn toggle_updates_the_view() {
    let router = create_router(state_in_station().await);

    let body = serde_json::json!({"itemId": "item-1"});
    let response = router
        .oneshot(post("/api/session/toggle", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(response).await;
    assert_eq!(view["markedCount"], 1);
    assert_eq!(view["totalItems"], 2);
    let entries = view["checklist"].as_array().unwrap();
    let entry = entries
        .iter()
        .find(|entry| entry["item"]["id"] == "item-1")
        .unwrap();
    assert_eq!(entry["status"], "full");
}

#[tokio::test]
async fn report_requires_the_results_screen() {
    let response = router().oneshot(get("/api/session/report")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn report_downloads_a_pdf_on_results() {
    let state = state_in_station().await;
    {
        let mut session = state.session.lock().await;
        session.toggle_item("item-1").unwrap();
        let context = session.finish_station().unwrap();
        session
            .apply_feedback(
                context.score,
                "Buen desempeño general.".to_string(),
                vec!["Conteo respiratorio correcto".to_string()],
                vec!["Dosis imprecisa".to_string()],
            )
            .unwrap();
    }

    let router = create_router(state);
    let response = router.oneshot(get("/api/session/report")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Evaluacion_Ana_Rojas.pdf"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn reset_returns_to_setup() {
    let router = create_router(state_in_station().await);
    let response = router.oneshot(post_empty("/api/session/reset")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let view = body_json(response).await;
    assert_eq!(view["screen"], "setup");
    assert!(view["case"].is_null());
    assert_eq!(view["teacherNote"], "");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = router().oneshot(get("/api/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
