//! Report generation against a finalized evaluation.

use std::collections::BTreeMap;

use ecoe_core::models::case::{
    Category, ChecklistItem, ClinicalCase, Specialty, StandardizedPatient, StudentInstructions,
    TeacherGuide,
};
use ecoe_core::models::evaluation::{ChecklistStatus, EvaluationState};
use ecoe_core::models::student::Student;
use ecoe_export::pdf::{generate_report, report_filename, status_label, wrap_text};

fn sample_case() -> ClinicalCase {
    let checklist = (1..=12)
        .map(|n| ChecklistItem {
            id: format!("item-{n}"),
            text: format!("Acción evaluada número {n} con una descripción razonablemente larga"),
            category: Category::Anamnesis,
            allow_partial: n <= 2,
            partial_criteria: (n <= 2).then(|| "Fármaco correcto, dosis errónea".to_string()),
        })
        .collect();

    ClinicalCase {
        specialty: Specialty::Urgencias,
        topic: "Fibrilación ventricular".to_string(),
        student_instructions: StudentInstructions {
            context: "Sala de reanimación".to_string(),
            case_summary: "Hombre de 58 años en paro cardiorrespiratorio".to_string(),
            tasks: vec!["Lidere la reanimación".to_string()],
        },
        teacher_guide: TeacherGuide {
            identification: "Hombre de 58 años".to_string(),
            chief_complaint: "Colapso súbito".to_string(),
            hpi: "Colapso presenciado hace 4 minutos".to_string(),
            ros: String::new(),
            past_medical_history: "Cardiopatía isquémica".to_string(),
            physical_exam: "Sin pulso, sin respiración".to_string(),
            vitals: String::new(),
            labs_and_imaging: String::new(),
            diagnosis: "Fibrilación ventricular".to_string(),
            treatment_plan: "Desfibrilación inmediata".to_string(),
        },
        standardized_patient: Some(StandardizedPatient {
            script: "(paciente inconsciente)".to_string(),
            acting_guidelines: "No responde".to_string(),
        }),
        checklist,
    }
}

fn sample_evaluation(case: &ClinicalCase) -> EvaluationState {
    let mut checklist = BTreeMap::new();
    for (i, item) in case.checklist.iter().enumerate() {
        let status = match i {
            0 => ChecklistStatus::Partial,
            1..=7 => ChecklistStatus::Full,
            _ => ChecklistStatus::None,
        };
        checklist.insert(item.id.clone(), status);
    }
    EvaluationState {
        checklist,
        score: 3.8,
        max_score: 5.0,
        feedback: "Buen manejo general del algoritmo de reanimación.".to_string(),
        strengths: vec![
            "Reconoció el ritmo desfibrilable de inmediato".to_string(),
            "Compresiones de alta calidad".to_string(),
            "Comunicación clara con el equipo".to_string(),
        ],
        weaknesses: vec![
            "Demoró la primera descarga".to_string(),
            "No verificó la vía aérea".to_string(),
            "Dosis de adrenalina imprecisa".to_string(),
        ],
        teacher_note: Some("Mantuvo la calma bajo presión".to_string()),
        finished_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

#[test]
fn generates_a_nonempty_pdf() {
    let case = sample_case();
    let evaluation = sample_evaluation(&case);
    let student = Student {
        name: "Ana María Rojas".to_string(),
        id: "1098765432".to_string(),
    };

    let bytes = generate_report(&student, &case, &evaluation).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1000);
}

#[test]
fn report_without_note_or_bullets_still_generates() {
    let case = sample_case();
    let mut evaluation = sample_evaluation(&case);
    evaluation.teacher_note = None;
    evaluation.strengths.clear();
    evaluation.weaknesses.clear();
    evaluation.feedback = String::new();
    let student = Student {
        name: "Luis Pérez".to_string(),
        id: "52".to_string(),
    };

    let bytes = generate_report(&student, &case, &evaluation).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn filename_replaces_whitespace_runs_with_underscores() {
    assert_eq!(report_filename("Ana María Rojas"), "Evaluacion_Ana_María_Rojas.pdf");
    assert_eq!(report_filename("  Juan   Díaz "), "Evaluacion_Juan_Díaz.pdf");
}

#[test]
fn status_labels_match_the_printed_legend() {
    assert_eq!(status_label(ChecklistStatus::Full), "SÍ (1.0)");
    assert_eq!(status_label(ChecklistStatus::Partial), "PARCIAL (0.5)");
    assert_eq!(status_label(ChecklistStatus::None), "NO");
}

#[test]
fn wrap_text_respects_the_limit_and_keeps_long_words_whole() {
    let lines = wrap_text("uno dos tres cuatro cinco", 9);
    assert_eq!(lines, vec!["uno dos", "tres", "cuatro", "cinco"]);

    let lines = wrap_text("palabrademasiadolarga corta", 10);
    assert_eq!(lines, vec!["palabrademasiadolarga", "corta"]);

    assert!(wrap_text("   ", 10).is_empty());
}
