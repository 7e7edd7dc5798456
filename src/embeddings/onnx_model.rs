// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Runtime encoder
//!
//! Wraps an ONNX Runtime session around the pretrained sentence
//! transformer (all-MiniLM-L6-v2 by default). The session is built once
//! at startup on the configured device; `cuda`/`auto` try the CUDA
//! execution provider first and fall back to CPU with a warning.
//!
//! ONNX Runtime performs inference only; no gradients are ever computed,
//! which also bounds memory use per batch.

use crate::config::Device;
use crate::embeddings::encoder::{SentenceEncoder, TokenizedBatch};
use crate::embeddings::EmbeddingError;
use anyhow::{Context, Result};
use ndarray::{Array3, Ix3};
use ort::execution_providers::{CPU as CPUExecutionProvider, CUDA as CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// ONNX-based sentence encoder
///
/// # Thread Safety
/// The session is wrapped in `Arc<Mutex>`: ONNX Runtime sessions require
/// exclusive access per call, so concurrent requests serialize through
/// this lock rather than corrupting shared device state.
#[derive(Clone)]
pub struct OnnxEncoder {
    /// ONNX Runtime session (locked per inference call)
    session: Arc<Mutex<Session>>,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,

    /// Device the session actually ended up on (after any fallback)
    device: Device,
}

impl std::fmt::Debug for OnnxEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEncoder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl OnnxEncoder {
    /// Loads the encoder from an ONNX model file onto the requested device.
    ///
    /// # Arguments
    /// - `model_name`: display name for logs and the /model endpoint
    /// - `model_path`: path to model.onnx
    /// - `device`: requested compute device; `Cuda` and `Auto` fall back
    ///   to CPU with a warning if the CUDA provider cannot initialize
    /// - `dimension`: expected hidden dimension of the encoder output
    ///
    /// # Errors
    /// Returns an error if the model file is missing or no execution
    /// provider can load it.
    pub fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        device: Device,
        dimension: usize,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        let (session, device_in_use) = match device {
            Device::Cpu => {
                info!("Loading encoder on CPU execution provider");
                (Self::build_cpu_session(model_path)?, Device::Cpu)
            }
            Device::Cuda | Device::Auto => {
                info!("Attempting CUDA execution provider...");
                let cuda_result = Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CUDAExecutionProvider::default().build()])
                    .map_err::<ort::Error, _>(ort::Error::from)
                    .context("Failed to set CUDA execution provider")?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .map_err::<ort::Error, _>(ort::Error::from)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(4)
                    .map_err::<ort::Error, _>(ort::Error::from)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path);

                match cuda_result {
                    Ok(s) => {
                        info!("✅ CUDA execution provider initialized");
                        (s, Device::Cuda)
                    }
                    Err(e) => {
                        warn!("⚠️  CUDA execution provider failed: {}", e);
                        warn!("   Falling back to CPU execution provider");
                        (Self::build_cpu_session(model_path)?, Device::Cpu)
                    }
                }
            }
        };

        info!(
            "✅ Encoder '{}' loaded on {} ({}d output)",
            model_name, device_in_use, dimension
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            model_name,
            dimension,
            device: device_in_use,
        })
    }

    fn build_cpu_session(model_path: &Path) -> Result<Session> {
        Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err::<ort::Error, _>(ort::Error::from)
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err::<ort::Error, _>(ort::Error::from)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .map_err::<ort::Error, _>(ort::Error::from)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))
    }

    /// Model name the encoder was loaded with
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Device the session runs on after any CUDA-to-CPU fallback
    pub fn device(&self) -> Device {
        self.device
    }
}

/// Maps an ONNX Runtime error to the embedding error taxonomy.
///
/// Allocation failures surface as `Resource` (503 at the API boundary);
/// everything else is an `Inference` failure (500).
fn classify_ort_error(error: ort::Error) -> EmbeddingError {
    let message = error.to_string();
    let lower = message.to_lowercase();
    if lower.contains("memory") || lower.contains("alloc") {
        EmbeddingError::Resource(message)
    } else {
        EmbeddingError::Inference(message)
    }
}

impl SentenceEncoder for OnnxEncoder {
    fn encode(&self, batch: &TokenizedBatch) -> Result<Array3<f32>, EmbeddingError> {
        let batch_size = batch.batch_size();
        let seq_len = batch.seq_len();

        let input_ids = Value::from_array(batch.input_ids.clone()).map_err(classify_ort_error)?;
        let attention_mask =
            Value::from_array(batch.attention_mask.clone()).map_err(classify_ort_error)?;
        let token_type_ids =
            Value::from_array(batch.token_type_ids.clone()).map_err(classify_ort_error)?;

        // Lock session for thread-safe access; one inference call at a time
        let mut session_guard = self.session.lock().unwrap();
        let outputs = session_guard
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(classify_ort_error)?;

        // Use index [0] instead of name since different models may have
        // different output names
        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .map_err(classify_ort_error)?;

        let shape = output_array.shape().to_vec();
        if shape != [batch_size, seq_len, self.dimension] {
            return Err(EmbeddingError::ShapeMismatch {
                hidden: shape,
                mask: vec![batch_size, seq_len],
            });
        }

        output_array
            .to_owned()
            .into_dimensionality::<Ix3>()
            .map_err(|e| EmbeddingError::Inference(e.to_string()))
    }

    fn hidden_dimension(&self) -> usize {
        self.dimension
    }
}
