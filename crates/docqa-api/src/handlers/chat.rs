//! Chat endpoint handler
//!
//! Validates the query before any outbound call, runs the pipeline,
//! and shapes the HTTP response. Request fields beyond `query` are
//! read leniently: an unusable `topK` or `fileTypes` falls back to the
//! configured default instead of failing the request.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use docqa_core::{ChatRequest, EffectiveParams, Snippet, SourceFile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Error message for a missing or non-string query
const MISSING_QUERY: &str = "Falta \"query\" (string)";

/// Chat response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Always `true` on success
    pub ok: bool,

    /// The query as received
    pub query: String,

    /// Effective retrieval parameters
    #[schema(value_type = Object)]
    pub used: EffectiveParams,

    /// Synthesized answer, never empty
    pub answer: String,

    /// Retrieved snippets, proxy order preserved
    #[schema(value_type = Vec<Object>)]
    pub snippets: Vec<Snippet>,

    /// Candidate source files
    #[schema(value_type = Vec<Object>)]
    pub top_files: Vec<SourceFile>,

    /// Debug preview fields
    pub debug: DebugInfo,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// First characters of the assembled context block
    pub context_preview: String,

    /// Number of non-empty snippets that fed the context
    pub snippets_count: usize,
}

/// Handle chat requests
#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    responses(
        (status = 200, description = "Answer generated", body = ChatResponse),
        (status = 400, description = "Missing or invalid query", body = crate::error::ApiError),
        (status = 500, description = "Retrieval failure", body = crate::error::ApiError)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    // Validation happens before any outbound call
    let query = body
        .get("query")
        .and_then(|v| v.as_str())
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_QUERY.to_string()))?;

    let request = ChatRequest {
        query: query.to_string(),
        path_prefix: body
            .get("pathPrefix")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        // Accepts non-integral numbers (e.g. 3.0) by flooring
        top_k: body
            .get("topK")
            .and_then(|v| v.as_f64())
            .map(|k| k.floor() as i64),
        file_types: body.get("fileTypes").and_then(|v| v.as_array()).map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        }),
    };

    tracing::info!(query = %request.query, "Chat request accepted");
    let outcome = state.pipeline.answer(&request).await?;

    Ok((
        StatusCode::OK,
        Json(ChatResponse {
            ok: true,
            query: request.query,
            used: outcome.used,
            answer: outcome.answer,
            snippets: outcome.snippets,
            top_files: outcome.top_files,
            debug: DebugInfo {
                context_preview: outcome.context_preview,
                snippets_count: outcome.snippets_count,
            },
        }),
    ))
}
