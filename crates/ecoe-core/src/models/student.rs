use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The examinee being graded. Captured at setup and immutable for the rest
/// of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Student {
    pub name: String,
    /// Identity document number.
    pub id: String,
}
