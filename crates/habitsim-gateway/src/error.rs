//! Gateway error types.
//!
//! The transport contract is deliberately forgiving: classified pipeline
//! failures travel inside a 200 response as schema-shaped payloads, so the
//! only errors surfacing here are the missing-input client error and
//! genuine internal faults.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use habitsim_core::orchestrator::OrchestratorError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required request field missing or blank — the single 400 path.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<OrchestratorError> for GatewayError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::MissingInput(field) => Self::MissingField(field),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
