// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Collaborator seams for the embedding pipeline
//!
//! The tokenizer and encoder are external collaborators with a narrow
//! numeric contract; they are consumed through the traits below so the
//! pipeline can be driven by deterministic stubs in tests.

use crate::embeddings::EmbeddingError;
use ndarray::{Array2, Array3};

/// A batch of tokenized sentences, padded to a common length.
///
/// All three arrays share the same (batch, seq_len) shape. The attention
/// mask is binary: 1 marks a real token, 0 marks padding. `token_type_ids`
/// is all zeros for single-sentence inputs but is part of the encoder's
/// input signature.
#[derive(Debug, Clone)]
pub struct TokenizedBatch {
    pub input_ids: Array2<i64>,
    pub attention_mask: Array2<i64>,
    pub token_type_ids: Array2<i64>,
}

impl TokenizedBatch {
    /// Number of sentences in the batch
    pub fn batch_size(&self) -> usize {
        self.input_ids.nrows()
    }

    /// Padded sequence length shared by all sentences in the batch
    pub fn seq_len(&self) -> usize {
        self.input_ids.ncols()
    }

    /// Attention mask as f32, the form the pooling math consumes
    pub fn attention_mask_f32(&self) -> Array2<f32> {
        self.attention_mask.mapv(|m| m as f32)
    }
}

/// Turns raw sentences into a padded token batch.
///
/// # Contract
/// Given N sentences, returns arrays of shape (N, T) for some T no
/// greater than the encoder's maximum input length. Padding to the batch
/// maximum and truncation of over-long sentences both happen here.
pub trait SentenceTokenizer: Send + Sync {
    fn tokenize_batch(&self, sentences: &[String]) -> Result<TokenizedBatch, EmbeddingError>;
}

/// Runs a tokenized batch through the pretrained encoder.
///
/// # Contract
/// Returns per-token hidden states shaped (batch, seq_len, hidden_dim)
/// matching the input batch shape. Invoked once per batch, never per
/// sentence, and inference-only: implementations must not accumulate
/// gradients or mutate model state.
pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, batch: &TokenizedBatch) -> Result<Array3<f32>, EmbeddingError>;

    /// Hidden dimension of the encoder output (embedding length)
    fn hidden_dimension(&self) -> usize;
}
