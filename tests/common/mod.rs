// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic stub collaborators for pipeline and API tests.
//!
//! The stubs honor the real collaborator contracts (padded (N, T)
//! batches, (B, T, H) hidden states) without loading any model, so the
//! pooling math and the HTTP boundary can be tested exactly.

#![allow(dead_code)]

use ndarray::{Array2, Array3};
use sentence_embed_node::api::{AppState, ModelDescriptor};
use sentence_embed_node::embeddings::{
    EmbeddingError, EmbeddingPipeline, SentenceEncoder, SentenceTokenizer, TokenizedBatch,
};
use std::sync::Arc;

/// Whitespace tokenizer: one token per word, id derived from word
/// length, padded to the batch maximum. An empty sentence produces an
/// all-zero attention mask (the degenerate case).
pub struct StubTokenizer;

impl SentenceTokenizer for StubTokenizer {
    fn tokenize_batch(&self, sentences: &[String]) -> Result<TokenizedBatch, EmbeddingError> {
        let token_ids: Vec<Vec<i64>> = sentences
            .iter()
            .map(|s| {
                s.split_whitespace()
                    .map(|word| word.len() as i64 + 1)
                    .collect()
            })
            .collect();

        let max_len = token_ids.iter().map(|ids| ids.len()).max().unwrap_or(0).max(1);
        let n = sentences.len();

        let mut input_ids = Array2::<i64>::zeros((n, max_len));
        let mut attention_mask = Array2::<i64>::zeros((n, max_len));
        for (i, ids) in token_ids.iter().enumerate() {
            for (t, &id) in ids.iter().enumerate() {
                input_ids[[i, t]] = id;
                attention_mask[[i, t]] = 1;
            }
        }

        Ok(TokenizedBatch {
            input_ids,
            attention_mask,
            token_type_ids: Array2::zeros((n, max_len)),
        })
    }
}

/// Encoder returning all-ones hidden states: every token vector points
/// in the same direction, so every normalized embedding is
/// (1/sqrt(H), ..., 1/sqrt(H)) regardless of padding.
pub struct OnesEncoder {
    pub dimension: usize,
}

impl SentenceEncoder for OnesEncoder {
    fn encode(&self, batch: &TokenizedBatch) -> Result<Array3<f32>, EmbeddingError> {
        Ok(Array3::ones((
            batch.batch_size(),
            batch.seq_len(),
            self.dimension,
        )))
    }

    fn hidden_dimension(&self) -> usize {
        self.dimension
    }
}

/// Encoder whose token vectors depend on the token id, so different
/// sentences get distinguishable embeddings. Deterministic.
pub struct TokenIdEncoder {
    pub dimension: usize,
}

impl SentenceEncoder for TokenIdEncoder {
    fn encode(&self, batch: &TokenizedBatch) -> Result<Array3<f32>, EmbeddingError> {
        let ids = &batch.input_ids;
        Ok(Array3::from_shape_fn(
            (batch.batch_size(), batch.seq_len(), self.dimension),
            |(i, t, h)| ids[[i, t]] as f32 + h as f32 * 0.5,
        ))
    }

    fn hidden_dimension(&self) -> usize {
        self.dimension
    }
}

/// Encoder that always fails with a resource error, for testing the
/// error path through the pipeline and the HTTP boundary.
pub struct FailingEncoder;

impl SentenceEncoder for FailingEncoder {
    fn encode(&self, _batch: &TokenizedBatch) -> Result<Array3<f32>, EmbeddingError> {
        Err(EmbeddingError::Resource(
            "device out of memory".to_string(),
        ))
    }

    fn hidden_dimension(&self) -> usize {
        4
    }
}

pub fn stub_pipeline(encoder: Arc<dyn SentenceEncoder>) -> Arc<EmbeddingPipeline> {
    Arc::new(EmbeddingPipeline::new(Arc::new(StubTokenizer), encoder))
}

pub fn stub_app_state(encoder: Arc<dyn SentenceEncoder>) -> AppState {
    let dimension = encoder.hidden_dimension();
    AppState {
        pipeline: stub_pipeline(encoder),
        model: ModelDescriptor {
            name: "stub-model".to_string(),
            dimension,
            max_sequence_length: 256,
            device: "cpu".to_string(),
        },
    }
}
