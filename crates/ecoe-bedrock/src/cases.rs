//! Case generation and narrative feedback via the Bedrock Converse API.
//!
//! Both operations send a system prompt that fixes the expected JSON shape
//! and parse the reply with serde. A reply that fails to parse is a
//! `SchemaViolation` — the same failure mode as a network error from the
//! caller's point of view. The two operations differ in failure policy:
//! generation propagates errors (the session returns to setup), feedback
//! degrades to a placeholder so the flow always reaches the results
//! screen.

use std::collections::{BTreeMap, HashSet};

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, Message, SystemContentBlock,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use ecoe_core::models::case::{
    ChecklistItem, ClinicalCase, Specialty, StandardizedPatient, StudentInstructions, TeacherGuide,
};
use ecoe_core::models::evaluation::ChecklistStatus;

use crate::error::BedrockError;
use crate::results;

// ── Prompts ──────────────────────────────────────────────────────────────────

const CASE_SYSTEM_PROMPT: &str = "\
Eres un generador de casos clínicos para estaciones de evaluación médica (ECOE/OSCE).

Responde ÚNICAMENTE con un objeto JSON válido, sin texto adicional ni bloques de código, con esta forma exacta:

{
  \"studentInstructions\": {
    \"context\": string,          // dónde está el estudiante, p. ej. urgencias, consulta externa
    \"caseSummary\": string,      // presentación breve del paciente para el estudiante
    \"tasks\": [string]           // órdenes concretas, p. ej. \"Realice anamnesis dirigida\"
  },
  \"teacherGuide\": {
    \"identification\": string,
    \"chiefComplaint\": string,
    \"hpi\": string,
    \"ros\": string,
    \"pastMedicalHistory\": string,
    \"physicalExam\": string,
    \"vitals\": string,
    \"labsAndImaging\": string,
    \"diagnosis\": string,
    \"treatmentPlan\": string
  },
  \"standardizedPatient\": {
    \"script\": string,           // guion corto para el actor
    \"actingGuidelines\": string  // cómo actuar (dolor, confusión, etc.)
  },
  \"checklist\": [
    {
      \"id\": string,             // único dentro del caso, p. ej. \"item-1\"
      \"text\": string,           // la acción que el estudiante debe realizar
      \"category\": \"Anamnesis\" | \"Examen Físico\" | \"Diagnóstico\" | \"Tratamiento\" | \"Comunicación\",
      \"allowPartial\": boolean,  // true para medicamentos o procedimientos complejos
      \"partialCriteria\": string // si allowPartial es true, qué otorga el medio punto
    }
  ]
}

La lista de chequeo debe tener entre 10 y 15 ítems distintos.";

const FEEDBACK_SYSTEM_PROMPT: &str = "\
Eres un profesor de medicina redactando retroalimentación de un ECOE.

Responde ÚNICAMENTE con un objeto JSON válido, sin texto adicional ni bloques de código, con esta forma exacta:

{
  \"feedback\": string,      // un párrafo de resumen constructivo
  \"strengths\": [string],   // exactamente 3 fortalezas
  \"weaknesses\": [string]   // exactamente 3 áreas de mejora
}";

fn case_user_prompt(specialty: Specialty, topic: &str) -> String {
    format!(
        "Genera un caso clínico detallado para una estación de evaluación médica (ECOE/OSCE).\n\
         Especialidad: {specialty}\n\
         Patología/Tema: {topic}\n\
         Nivel: Estudiante de Medicina de Pregrado (Interno). El caso NO debe ser nivel residente/especialista.\n\n\
         El caso debe evaluar el razonamiento diagnóstico y la toma de decisiones acorde a un médico general en formación.\n\
         Incluye una lista de chequeo precisa.\n\n\
         IMPORTANTE SOBRE LA LISTA DE CHEQUEO:\n\
         - Para ítems de Farmacología (medicamentos) o Procedimientos complejos, habilita \"allowPartial\": true.\n\
         - Define \"partialCriteria\" explicando que el estudiante recibe medio punto si menciona el medicamento correcto pero falla en dosis/presentación.",
    )
}

// ── Wire types ───────────────────────────────────────────────────────────────

/// The model's case response: a [`ClinicalCase`] minus the echoed
/// specialty and topic.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedCase {
    student_instructions: StudentInstructions,
    teacher_guide: TeacherGuide,
    #[serde(default)]
    standardized_patient: Option<StandardizedPatient>,
    checklist: Vec<ChecklistItem>,
}

/// Narrative feedback for the finalized station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl FeedbackResponse {
    /// The degraded placeholder used when the feedback call fails.
    pub fn unavailable() -> Self {
        Self {
            feedback: "No se pudo generar retroalimentación automática.".to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        }
    }
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Generate a clinical case for `(specialty, topic)`.
///
/// Single attempt, no retry. Every failure — network, parse, or contract
/// violation — propagates as a [`BedrockError`]; the caller decides how to
/// notify the operator.
pub async fn generate_case(
    config: &aws_config::SdkConfig,
    model_id: &str,
    specialty: Specialty,
    topic: &str,
) -> Result<ClinicalCase, BedrockError> {
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, model = model_id, %specialty, topic, "starting case generation");

    let user_prompt = case_user_prompt(specialty, topic);
    let response_text = invoke_converse(config, model_id, CASE_SYSTEM_PROMPT, &user_prompt).await?;
    let case = parse_case_response(specialty, topic, &response_text)?;

    info!(
        request_id = %request_id,
        items = case.checklist.len(),
        "case generation complete"
    );

    Ok(case)
}

/// Parse and validate a case-generation reply.
///
/// Enforces the gateway contract so downstream code never re-validates:
/// the checklist must be non-empty and its item ids unique.
pub fn parse_case_response(
    specialty: Specialty,
    topic: &str,
    response_text: &str,
) -> Result<ClinicalCase, BedrockError> {
    let json = strip_code_fences(response_text);
    let generated: GeneratedCase = serde_json::from_str(json).map_err(|e| {
        BedrockError::SchemaViolation(format!("failed to parse clinical case: {e}"))
    })?;

    if generated.checklist.is_empty() {
        return Err(BedrockError::SchemaViolation(
            "case has an empty checklist".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for item in &generated.checklist {
        if !seen.insert(item.id.as_str()) {
            return Err(BedrockError::SchemaViolation(format!(
                "duplicate checklist item id: {}",
                item.id
            )));
        }
    }

    Ok(ClinicalCase {
        specialty,
        topic: topic.to_string(),
        student_instructions: generated.student_instructions,
        teacher_guide: generated.teacher_guide,
        standardized_patient: generated.standardized_patient,
        checklist: generated.checklist,
    })
}

/// Generate narrative feedback for a finalized station.
///
/// Infallible by design: any failure is absorbed into the placeholder
/// response so the session always reaches the results screen.
pub async fn generate_feedback(
    config: &aws_config::SdkConfig,
    model_id: &str,
    case: &ClinicalCase,
    checklist_results: &BTreeMap<String, ChecklistStatus>,
    teacher_note: Option<&str>,
) -> FeedbackResponse {
    match try_generate_feedback(config, model_id, case, checklist_results, teacher_note).await {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!(error = %e, "feedback generation failed, returning placeholder");
            FeedbackResponse::unavailable()
        }
    }
}

async fn try_generate_feedback(
    config: &aws_config::SdkConfig,
    model_id: &str,
    case: &ClinicalCase,
    checklist_results: &BTreeMap<String, ChecklistStatus>,
    teacher_note: Option<&str>,
) -> Result<FeedbackResponse, BedrockError> {
    info!(model = model_id, topic = %case.topic, "starting feedback generation");

    let breakdown = results::partition(case, checklist_results);
    let user_prompt = results::feedback_prompt(case, &breakdown, teacher_note);
    let response_text =
        invoke_converse(config, model_id, FEEDBACK_SYSTEM_PROMPT, &user_prompt).await?;

    let feedback: FeedbackResponse = serde_json::from_str(strip_code_fences(&response_text))
        .map_err(|e| BedrockError::SchemaViolation(format!("failed to parse feedback: {e}")))?;

    info!("feedback generation complete");

    Ok(feedback)
}

// ── Invocation ───────────────────────────────────────────────────────────────

/// Core invocation using the Bedrock Converse API. Returns the response
/// text and logs token usage.
async fn invoke_converse(
    config: &aws_config::SdkConfig,
    model_id: &str,
    system_prompt: &str,
    user_message: &str,
) -> Result<String, BedrockError> {
    let client = Client::new(config);

    let response = client
        .converse()
        .model_id(model_id)
        .system(SystemContentBlock::Text(system_prompt.to_string()))
        .messages(
            Message::builder()
                .role(ConversationRole::User)
                .content(ContentBlock::Text(user_message.to_string()))
                .build()
                .map_err(|e| BedrockError::Invocation(e.to_string()))?,
        )
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    if let Some(usage) = response.usage() {
        info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "converse call complete"
        );
    }

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

    let response_text = output_message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    Ok(response_text)
}

/// Strip a Markdown code fence wrapper from a model reply. Models sometimes
/// fence their JSON despite the instructions; the content inside is
/// returned unchanged.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
