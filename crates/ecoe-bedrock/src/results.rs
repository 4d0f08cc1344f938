//! Feedback prompt assembly.
//!
//! Partitions the finalized checklist into the three labeled groups the
//! feedback model reasons over, and builds the outbound prompt text.

use std::collections::BTreeMap;

use ecoe_core::models::case::ClinicalCase;
use ecoe_core::models::evaluation::ChecklistStatus;

/// Checklist items grouped by outcome, as human-readable lines.
#[derive(Debug, Clone, Default)]
pub struct ChecklistBreakdown {
    /// Fully performed items.
    pub completed: Vec<String>,
    /// Partially performed items, annotated with the partial-credit
    /// rationale.
    pub partial: Vec<String>,
    /// Missed or incorrect items (status `none`, or no entry at all).
    pub missed: Vec<String>,
}

/// Group the case's checklist items by their finalized status.
pub fn partition(
    case: &ClinicalCase,
    results: &BTreeMap<String, ChecklistStatus>,
) -> ChecklistBreakdown {
    let mut breakdown = ChecklistBreakdown::default();

    for item in &case.checklist {
        let status = results
            .get(&item.id)
            .copied()
            .unwrap_or(ChecklistStatus::None);
        match status {
            ChecklistStatus::Full => breakdown.completed.push(item.text.clone()),
            ChecklistStatus::Partial => breakdown.partial.push(format!(
                "{} (Realizado parcialmente: {})",
                item.text,
                item.partial_criteria.as_deref().unwrap_or("Incompleto"),
            )),
            ChecklistStatus::None => breakdown.missed.push(item.text.clone()),
        }
    }

    breakdown
}

/// Build the user prompt for the feedback call.
pub fn feedback_prompt(
    case: &ClinicalCase,
    breakdown: &ChecklistBreakdown,
    teacher_note: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Actúa como un profesor de medicina evaluando un ECOE de {}.\n\
         Nivel del estudiante: Pregrado (Interno).\n\n\
         Resultados del estudiante:\n",
        case.topic,
    );

    push_group(&mut prompt, "Completos", &breakdown.completed);
    push_group(&mut prompt, "Parciales (0.5 ptos)", &breakdown.partial);
    push_group(&mut prompt, "Omitidos/Incorrectos", &breakdown.missed);

    if let Some(note) = teacher_note {
        prompt.push_str(&format!(
            "\nNOTA OBSERVACIONAL DEL DOCENTE (Usa esto para personalizar el feedback): \"{note}\"\n",
        ));
    }

    prompt.push_str(
        "\nGenera:\n\
         1. Un párrafo de resumen constructivo. Si hay nota del docente, incorpórala en el análisis.\n\
         2. 3 fortalezas.\n\
         3. 3 áreas de mejora.\n",
    );

    prompt
}

fn push_group(prompt: &mut String, label: &str, lines: &[String]) {
    prompt.push_str(&format!("{label}:\n"));
    if lines.is_empty() {
        prompt.push_str("- (ninguno)\n");
        return;
    }
    for line in lines {
        prompt.push_str(&format!("- {line}\n"));
    }
}
