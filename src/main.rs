// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use sentence_embed_node::{
    api::{start_server, AppState, ModelDescriptor},
    config::ServiceConfig,
    embeddings::{EmbeddingPipeline, HfTokenizer, OnnxEncoder},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Sentence Embed Node...\n");
    println!("📦 BUILD VERSION: {}", sentence_embed_node::version::VERSION);
    println!();

    let config = ServiceConfig::from_env()?;

    // Load the tokenizer and encoder once; both are shared read-only
    // across all requests for the life of the process.
    println!(
        "🧠 Loading embedding model '{}' (requested device: {})",
        config.model_name, config.device
    );

    let tokenizer = HfTokenizer::from_file(&config.tokenizer_path, config.max_sequence_length)?;
    let encoder = OnnxEncoder::new(
        &config.model_name,
        &config.model_path,
        config.device,
        config.hidden_dimension,
    )?;

    let model = ModelDescriptor {
        name: config.model_name.clone(),
        dimension: config.hidden_dimension,
        max_sequence_length: config.max_sequence_length,
        device: encoder.device().to_string(),
    };

    let pipeline = Arc::new(EmbeddingPipeline::new(
        Arc::new(tokenizer),
        Arc::new(encoder),
    ));
    println!("✅ Embedding pipeline ready ({}d vectors)", model.dimension);

    let state = AppState { pipeline, model };
    start_server(state, config.api_port)
        .await
        .map_err(|e| anyhow::anyhow!("API server failed: {}", e))?;

    Ok(())
}
