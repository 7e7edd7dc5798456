// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding pipeline
//!
//! This module contains the whole embedding computation path:
//! - Tokenization adapter around the HuggingFace tokenizer (padding/truncation)
//! - ONNX Runtime encoder invocation (single batched call, CUDA with CPU fallback)
//! - Attention-mask-aware mean pooling and L2 normalization
//!
//! The tokenizer and encoder sit behind the [`SentenceTokenizer`] and
//! [`SentenceEncoder`] traits so the pipeline and the pooling math can be
//! exercised with deterministic stubs in tests.

pub mod encoder;
pub mod onnx_model;
pub mod pipeline;
pub mod pooling;
pub mod tokenizer;

pub use encoder::{SentenceEncoder, SentenceTokenizer, TokenizedBatch};
pub use onnx_model::OnnxEncoder;
pub use pipeline::EmbeddingPipeline;
pub use pooling::pool_and_normalize;
pub use tokenizer::HfTokenizer;

use thiserror::Error;

/// Errors that can occur while computing sentence embeddings
///
/// A sentence that tokenizes to zero real tokens is deliberately NOT an
/// error: the pooling clamp keeps the division finite and the resulting
/// embedding is returned as a zero vector (see [`pooling`]).
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Tokenizer failed to encode the input batch
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    /// Hidden states and attention mask disagree on batch/sequence shape,
    /// or the encoder returned a wrong-shaped output. Indicates a
    /// collaborator contract breach, never a caller mistake.
    #[error("Shape mismatch: hidden states {hidden:?} vs attention mask {mask:?}")]
    ShapeMismatch {
        hidden: Vec<usize>,
        mask: Vec<usize>,
    },

    /// Encoder inference failed
    #[error("Encoder inference failed: {0}")]
    Inference(String),

    /// Device or memory exhaustion during encoding. Not retried here;
    /// retry policy belongs to the caller.
    #[error("Resource exhaustion during encoding: {0}")]
    Resource(String),
}
