// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Batch orchestration
//!
//! Drives one request through tokenize → encode → pool → normalize.
//! The tokenizer and encoder are injected at construction (loaded once
//! at startup, shared across requests behind `Arc`), so the pipeline
//! itself holds no model state and is cheap to clone.

use crate::embeddings::encoder::{SentenceEncoder, SentenceTokenizer};
use crate::embeddings::pooling::pool_and_normalize;
use crate::embeddings::EmbeddingError;
use std::sync::Arc;
use tracing::debug;

/// Orchestrates the embedding computation for one sentence batch
#[derive(Clone)]
pub struct EmbeddingPipeline {
    tokenizer: Arc<dyn SentenceTokenizer>,
    encoder: Arc<dyn SentenceEncoder>,
}

impl EmbeddingPipeline {
    pub fn new(tokenizer: Arc<dyn SentenceTokenizer>, encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self { tokenizer, encoder }
    }

    /// Hidden dimension of the embeddings this pipeline produces
    pub fn hidden_dimension(&self) -> usize {
        self.encoder.hidden_dimension()
    }

    /// Embeds a single sentence. Thin wrapper over [`Self::embed_batch`].
    pub async fn embed(&self, sentence: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[sentence.to_string()]).await?;
        embeddings.pop().ok_or_else(|| EmbeddingError::ShapeMismatch {
            hidden: vec![0],
            mask: vec![1],
        })
    }

    /// Embeds a batch of sentences, preserving input order.
    ///
    /// The encoder is invoked exactly once for the whole batch. An empty
    /// batch short-circuits to an empty result without touching the
    /// collaborators.
    ///
    /// # Errors
    /// Propagates tokenizer and encoder failures unchanged, and returns
    /// [`EmbeddingError::ShapeMismatch`] if the pooled output does not
    /// line up with the input batch; a wrong-shaped result is never
    /// returned silently.
    pub async fn embed_batch(
        &self,
        sentences: &[String],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if sentences.is_empty() {
            return Ok(vec![]);
        }

        let tokenized = self.tokenizer.tokenize_batch(sentences)?;
        debug!(
            "Tokenized {} sentences to shape ({}, {})",
            sentences.len(),
            tokenized.batch_size(),
            tokenized.seq_len()
        );

        let hidden_states = self.encoder.encode(&tokenized)?;
        let attention_mask = tokenized.attention_mask_f32();
        let embeddings = pool_and_normalize(hidden_states.view(), attention_mask.view())?;

        if embeddings.len() != sentences.len() {
            return Err(EmbeddingError::ShapeMismatch {
                hidden: vec![embeddings.len()],
                mask: vec![sentences.len()],
            });
        }

        Ok(embeddings)
    }
}
