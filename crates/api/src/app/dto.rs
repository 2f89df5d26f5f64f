use serde::Serialize;

use cinedex_core::{RecordId, Violation};

// -------------------------
// Response DTOs
// -------------------------

/// Body of a `201 Created` answer.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: RecordId,
}

/// Body of a `422 Unprocessable Entity` answer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorsResponse {
    pub validation_errors: Vec<Violation>,
}
