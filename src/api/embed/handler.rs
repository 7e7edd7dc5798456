// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler
//!
//! Thin request boundary: shape/type validation of the JSON body and
//! error mapping only. All numeric work happens in the embedding
//! pipeline.

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::errors::{ApiError, ErrorResponse};
use crate::api::http_server::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

/// POST /embed handler
///
/// # Request Body
/// ```json
/// { "sentences": ["text1", "text2", ...] }
/// ```
///
/// # Response Body
/// A bare JSON array with one embedding vector per input sentence, in
/// input order. An empty `sentences` array returns `[]`.
///
/// # Errors
/// - 400 with an [`ErrorResponse`] body for a missing/malformed
///   `sentences` key or non-string elements
/// - 500 for internal tokenizer/encoder/pooling failures
/// - 503 for device or memory exhaustion during encoding
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        let api_error = match &rejection {
            JsonRejection::JsonDataError(_) => ApiError::ValidationError {
                field: "sentences".to_string(),
                message: rejection.body_text(),
            },
            _ => ApiError::InvalidRequest(rejection.body_text()),
        };
        error_response(api_error)
    })?;

    let embeddings = state
        .pipeline
        .embed_batch(&request.sentences)
        .await
        .map_err(|e| {
            // Internal invariant violations are logged, not silently swallowed
            error!("Embedding pipeline failed: {}", e);
            error_response(ApiError::from(e))
        })?;

    Ok(Json(EmbedResponse::from(embeddings)))
}

fn error_response(error: ApiError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error.to_response(None)))
}
