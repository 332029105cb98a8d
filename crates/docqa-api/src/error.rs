//! API error handling
//!
//! Every failure surfaces as a JSON body of the shape
//! `{ ok: false, error, status, details }` with a matching HTTP status.
//! Only the mandatory path (validation, retrieval) produces these;
//! completion failures are absorbed inside the pipeline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docqa_core::DocqaError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape of an error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always `false`
    pub ok: bool,

    /// Human-readable message
    pub error: String,

    /// Mirrors the HTTP status of the response
    pub status: u16,

    /// Upstream error body when the retrieval proxy supplied one
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            status,
            details: None,
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Upstream {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self {
            AppError::BadRequest(msg) => ApiError::new(400, msg),
            AppError::Upstream {
                status,
                message,
                details,
            } => ApiError {
                ok: false,
                error: message,
                status,
                details,
            },
            AppError::Internal(msg) => ApiError::new(500, msg),
        };

        let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

impl From<DocqaError> for AppError {
    fn from(err: DocqaError) -> Self {
        match err {
            DocqaError::Validation(msg) => AppError::BadRequest(msg),
            DocqaError::Retrieval {
                status,
                message,
                details,
            } => AppError::Upstream {
                // Transport failures (no HTTP status) default to 500
                status: status.unwrap_or(500),
                message,
                details,
            },
            DocqaError::Completion(msg) => AppError::Internal(format!("Completion error: {msg}")),
            DocqaError::Config(msg) => AppError::Internal(format!("Configuration error: {msg}")),
            DocqaError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}
