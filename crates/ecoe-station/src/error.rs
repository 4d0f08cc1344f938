use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("student name and id are required")]
    MissingStudentFields,

    #[error("operation requires screen '{expected}' but session is on '{actual}'")]
    InvalidScreen {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("no active clinical case")]
    NoCase,

    #[error("checklist item not found: {0}")]
    UnknownItem(String),

    #[error("response does not belong to the active generation request")]
    StaleResponse,

    #[error("cannot score a case with an empty checklist")]
    EmptyChecklist,
}
