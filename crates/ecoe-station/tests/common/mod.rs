//! Shared fixtures for the station tests.
#![allow(dead_code)]

use ecoe_core::models::case::{
    Category, ChecklistItem, ClinicalCase, Specialty, StandardizedPatient, StudentInstructions,
    TeacherGuide,
};

pub fn item(id: &str, allow_partial: bool) -> ChecklistItem {
    ChecklistItem {
        id: id.to_string(),
        text: format!("Acción {id}"),
        category: Category::Anamnesis,
        allow_partial,
        partial_criteria: allow_partial.then(|| "Menciona el fármaco, falla la dosis".to_string()),
    }
}

pub fn case_with(checklist: Vec<ChecklistItem>) -> ClinicalCase {
    ClinicalCase {
        specialty: Specialty::MedicinaInterna,
        topic: "Infarto agudo de miocardio con elevación del ST".to_string(),
        student_instructions: StudentInstructions {
            context: "Servicio de urgencias".to_string(),
            case_summary: "Hombre de 54 años con dolor torácico opresivo".to_string(),
            tasks: vec!["Realice anamnesis dirigida".to_string()],
        },
        teacher_guide: TeacherGuide {
            identification: "Hombre de 54 años".to_string(),
            chief_complaint: "Dolor torácico".to_string(),
            hpi: "Dolor opresivo de 2 horas de evolución".to_string(),
            ros: String::new(),
            past_medical_history: "HTA, tabaquismo".to_string(),
            physical_exam: "Diaforético, pálido".to_string(),
            vitals: "TA 150/90, FC 98".to_string(),
            labs_and_imaging: "ECG con elevación del ST en cara inferior".to_string(),
            diagnosis: "IAMCEST".to_string(),
            treatment_plan: "Reperfusión urgente".to_string(),
        },
        standardized_patient: Some(StandardizedPatient {
            script: "Me duele el pecho desde hace dos horas".to_string(),
            acting_guidelines: "Ansioso, con dolor visible".to_string(),
        }),
        checklist,
    }
}

/// A ten-item case: ids `item-1..item-10`, the first four allow partial
/// credit.
pub fn ten_item_case() -> ClinicalCase {
    let checklist = (1..=10)
        .map(|n| item(&format!("item-{n}"), n <= 4))
        .collect();
    case_with(checklist)
}
