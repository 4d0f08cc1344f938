//! The generated clinical case and its fixed catalog of specialties and
//! topics.
//!
//! Wire names are camelCase and match the JSON shape the case-generation
//! model is asked to produce, so a response deserializes straight into
//! these types.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The five specialties a station can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Specialty {
    #[serde(rename = "Cirugía General")]
    CirugiaGeneral,
    #[serde(rename = "Urgencias")]
    Urgencias,
    #[serde(rename = "Medicina Interna")]
    MedicinaInterna,
    #[serde(rename = "Ginecología")]
    Ginecologia,
    #[serde(rename = "Pediatría")]
    Pediatria,
}

impl Specialty {
    pub const ALL: [Specialty; 5] = [
        Specialty::CirugiaGeneral,
        Specialty::Urgencias,
        Specialty::MedicinaInterna,
        Specialty::Ginecologia,
        Specialty::Pediatria,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::CirugiaGeneral => "Cirugía General",
            Specialty::Urgencias => "Urgencias",
            Specialty::MedicinaInterna => "Medicina Interna",
            Specialty::Ginecologia => "Ginecología",
            Specialty::Pediatria => "Pediatría",
        }
    }

    /// The fixed topic list a station for this specialty draws from.
    pub fn topics(&self) -> &'static [&'static str] {
        match self {
            Specialty::CirugiaGeneral => &[
                "Apendicitis aguda",
                "Colelitiasis con colecistitis (Tokio II)",
                "Obstrucción intestinal",
            ],
            Specialty::Urgencias => &[
                "Taquicardia supraventricular inestable",
                "Fibrilación ventricular",
                "Taquicardia ventricular",
            ],
            Specialty::MedicinaInterna => &[
                "Infarto agudo de miocardio con elevación del ST",
                "Tromboembolismo pulmonar agudo",
                "EPOC exacerbado sobreinfectado",
                "Accidente cerebrovascular",
            ],
            Specialty::Ginecologia => &[
                "Preeclampsia",
                "Amenaza de parto pretérmino",
                "Sepsis puerperal",
                "Código rojo",
            ],
            Specialty::Pediatria => &["Otitis media aguda (AIEPI)", "Neumonía (AIEPI)"],
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grading category of a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    Anamnesis,
    #[serde(rename = "Examen Físico")]
    ExamenFisico,
    #[serde(rename = "Diagnóstico")]
    Diagnostico,
    Tratamiento,
    #[serde(rename = "Comunicación")]
    Comunicacion,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anamnesis => "Anamnesis",
            Category::ExamenFisico => "Examen Físico",
            Category::Diagnostico => "Diagnóstico",
            Category::Tratamiento => "Tratamiento",
            Category::Comunicacion => "Comunicación",
        }
    }
}

/// One gradable action expected of the examinee.
///
/// `id` is unique within a case — the gateway validates this before a case
/// reaches the session, so consumers can index by it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub category: Category,
    /// When true the item is eligible for half credit.
    #[serde(default)]
    pub allow_partial: bool,
    /// What earns the half point (e.g. correct drug, wrong dose).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_criteria: Option<String>,
}

/// What the examinee is told at the start of the station.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StudentInstructions {
    /// Clinical setting (e.g. ER, outpatient clinic).
    pub context: String,
    pub case_summary: String,
    /// Specific commands, e.g. "Perform a focused history".
    pub tasks: Vec<String>,
}

/// Instructor-only reference describing the true clinical picture.
///
/// The model is only required to fill the core fields; the rest default to
/// empty when absent from the response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TeacherGuide {
    pub identification: String,
    pub chief_complaint: String,
    /// History of present illness.
    pub hpi: String,
    #[serde(default)]
    pub ros: String,
    #[serde(default)]
    pub past_medical_history: String,
    pub physical_exam: String,
    #[serde(default)]
    pub vitals: String,
    #[serde(default)]
    pub labs_and_imaging: String,
    pub diagnosis: String,
    pub treatment_plan: String,
}

/// Script and direction for the human actor playing the patient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StandardizedPatient {
    pub script: String,
    pub acting_guidelines: String,
}

/// A complete generated station case. Immutable after generation —
/// regeneration replaces the whole object, never merges.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClinicalCase {
    pub specialty: Specialty,
    pub topic: String,
    pub student_instructions: StudentInstructions,
    pub teacher_guide: TeacherGuide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standardized_patient: Option<StandardizedPatient>,
    pub checklist: Vec<ChecklistItem>,
}
