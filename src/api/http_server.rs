// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP server wiring
//!
//! One POST endpoint does the work; /health and /model exist for
//! liveness probes and client discovery of the fixed encoder.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

use crate::api::embed::embed_handler;
use crate::embeddings::EmbeddingPipeline;
use crate::version;

/// Static description of the one encoder this service exposes
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescriptor {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Embedding dimension
    pub dimension: usize,
    /// Maximum input sequence length; longer inputs are truncated
    pub max_sequence_length: usize,
    /// Device the encoder session runs on ("cuda" or "cpu")
    pub device: String,
}

/// Shared per-request state: the pipeline (model loaded once at startup,
/// read-only afterwards) and the model descriptor for /health and /model.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EmbeddingPipeline>,
    pub model: ModelDescriptor,
}

/// Builds the service router. Split out of [`start_server`] so tests can
/// drive it with `tower::ServiceExt::oneshot` without binding a port.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Model discovery endpoint
        .route("/model", get(model_handler))
        // Embedding endpoint
        .route("/embed", post(embed_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(
    state: AppState,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Embedding API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "model": state.model.name,
        "dimension": state.model.dimension,
        "version": version::VERSION_NUMBER,
    }))
}

async fn model_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.model.clone())
}
