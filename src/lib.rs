// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod version;

// Re-export main types
pub use api::{ApiError, EmbedRequest, EmbedResponse, ErrorResponse};
pub use config::{Device, ServiceConfig};
pub use embeddings::{
    EmbeddingError, EmbeddingPipeline, HfTokenizer, OnnxEncoder, SentenceEncoder,
    SentenceTokenizer, TokenizedBatch,
};
