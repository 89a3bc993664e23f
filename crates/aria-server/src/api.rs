//! Shared API types and the persona catalogue handler.

use aria_types::{Accent, ValidationError, PERSONAS};
use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Only requests the pipeline refuses to run produce an `ApiError`. Provider
/// failures are reported inside a successful [`aria_types::TransformResult`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// One entry of the persona catalogue.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Accents with a dedicated voice. Other accents use the default voice.
    pub accents: Vec<Accent>,
}

/// Handler for `GET /api/personas`.
pub async fn list_personas_handler() -> Json<Vec<PersonaSummary>> {
    Json(
        PERSONAS
            .iter()
            .map(|persona| PersonaSummary {
                id: persona.id.to_string(),
                name: persona.name.to_string(),
                description: persona.description.to_string(),
                accents: persona.accents().collect(),
            })
            .collect(),
    )
}
