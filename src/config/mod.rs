// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! All configuration is read once at startup from environment variables
//! and threaded through the rest of the service as an explicit value.
//! The compute device in particular is selected here and handed to the
//! encoder at load time; nothing downstream re-reads the environment.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Compute device the encoder session is built on.
///
/// Selected once at startup from `EMBEDDING_DEVICE`. `Auto` tries CUDA
/// first and falls back to CPU if the provider cannot be initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Try CUDA, fall back to CPU (default when unset)
    Auto,
    /// CUDA execution provider (still falls back to CPU with a warning
    /// if CUDA is unavailable on the host)
    Cuda,
    /// CPU execution provider only
    Cpu,
}

impl FromStr for Device {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Device::Auto),
            "cuda" | "gpu" => Ok(Device::Cuda),
            "cpu" => Ok(Device::Cpu),
            other => Err(anyhow!(
                "Invalid EMBEDDING_DEVICE '{}' (expected auto, cuda or cpu)",
                other
            )),
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Auto => write!(f, "auto"),
            Device::Cuda => write!(f, "cuda"),
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

/// Runtime configuration for the embedding service
///
/// # Environment Variables
/// - `API_PORT`: HTTP listen port (default: 8080)
/// - `EMBEDDING_DEVICE`: auto | cuda | cpu (default: auto)
/// - `EMBEDDING_MODEL_NAME`: model name reported by /health and /model
/// - `EMBEDDING_MODEL_PATH`: path to the ONNX model file
/// - `EMBEDDING_TOKENIZER_PATH`: path to the tokenizer JSON file
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port
    pub api_port: u16,

    /// Compute device for the encoder session
    pub device: Device,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub model_name: String,

    /// Path to ONNX model file (model.onnx)
    pub model_path: PathBuf,

    /// Path to tokenizer JSON file (tokenizer.json)
    pub tokenizer_path: PathBuf,

    /// Encoder output dimension (384 for all-MiniLM-L6-v2)
    pub hidden_dimension: usize,

    /// Maximum input sequence length; longer inputs are truncated
    pub max_sequence_length: usize,
}

impl ServiceConfig {
    /// Loads the configuration from environment variables.
    ///
    /// Missing variables fall back to defaults; malformed values
    /// (unparseable port, unknown device) are startup errors.
    pub fn from_env() -> Result<Self> {
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow!("Invalid API_PORT: {}", e))?;

        let device = env::var("EMBEDDING_DEVICE")
            .unwrap_or_else(|_| "auto".to_string())
            .parse::<Device>()?;

        let model_name =
            env::var("EMBEDDING_MODEL_NAME").unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string());

        let model_path = env::var("EMBEDDING_MODEL_PATH")
            .unwrap_or_else(|_| "./models/all-MiniLM-L6-v2-onnx/model.onnx".to_string());

        let tokenizer_path = env::var("EMBEDDING_TOKENIZER_PATH")
            .unwrap_or_else(|_| "./models/all-MiniLM-L6-v2-onnx/tokenizer.json".to_string());

        Ok(Self {
            api_port,
            device,
            model_name,
            model_path: PathBuf::from(model_path),
            tokenizer_path: PathBuf::from(tokenizer_path),
            hidden_dimension: 384,
            max_sequence_length: 256,
        })
    }
}
