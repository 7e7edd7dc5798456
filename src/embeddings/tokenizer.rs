// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HuggingFace tokenizer adapter
//!
//! Wraps `tokenizers::Tokenizer` behind the [`SentenceTokenizer`] seam:
//! encodes a whole batch, truncates anything beyond the encoder's maximum
//! input length, and pads every sentence to the batch maximum with a
//! matching binary attention mask.

use crate::embeddings::encoder::{SentenceTokenizer, TokenizedBatch};
use crate::embeddings::EmbeddingError;
use anyhow::Result;
use ndarray::Array2;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

/// BERT-style tokenizer loaded from a tokenizer.json file
pub struct HfTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl HfTokenizer {
    /// Loads the tokenizer from disk and configures truncation.
    ///
    /// # Arguments
    /// - `tokenizer_path`: path to tokenizer.json
    /// - `max_length`: maximum sequence length; longer inputs are truncated
    ///
    /// # Errors
    /// Returns an error if the file is missing or not a valid tokenizer.
    pub fn from_file<P: AsRef<Path>>(tokenizer_path: P, max_length: usize) -> Result<Self> {
        let tokenizer_path = tokenizer_path.as_ref();
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        info!(
            "Tokenizer loaded from {} (max_length={})",
            tokenizer_path.display(),
            max_length
        );

        Ok(Self {
            tokenizer,
            max_length,
        })
    }

    /// Maximum sequence length this tokenizer truncates to
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl SentenceTokenizer for HfTokenizer {
    fn tokenize_batch(&self, sentences: &[String]) -> Result<TokenizedBatch, EmbeddingError> {
        let encodings = self
            .tokenizer
            .encode_batch(sentences.to_vec(), true)
            .map_err(|e| EmbeddingError::Tokenization(e.to_string()))?;

        // Pad every sentence to the longest in the batch
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(sentences.len() * max_len);
        let mut attention_mask = Vec::with_capacity(sentences.len() * max_len);
        let mut token_type_ids = Vec::with_capacity(sentences.len() * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(mask.iter().map(|&m| m as i64));
            token_type_ids.extend(std::iter::repeat(0i64).take(ids.len()));

            let padding_needed = max_len - ids.len();
            input_ids.extend(std::iter::repeat(0i64).take(padding_needed));
            attention_mask.extend(std::iter::repeat(0i64).take(padding_needed));
            token_type_ids.extend(std::iter::repeat(0i64).take(padding_needed));
        }

        let shape = (sentences.len(), max_len);
        let to_shape_err = |e: ndarray::ShapeError| EmbeddingError::Tokenization(e.to_string());

        Ok(TokenizedBatch {
            input_ids: Array2::from_shape_vec(shape, input_ids).map_err(to_shape_err)?,
            attention_mask: Array2::from_shape_vec(shape, attention_mask).map_err(to_shape_err)?,
            token_type_ids: Array2::from_shape_vec(shape, token_type_ids).map_err(to_shape_err)?,
        })
    }
}
