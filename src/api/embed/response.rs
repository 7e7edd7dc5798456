// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for the POST /embed endpoint

use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// Serializes as a bare JSON array of arrays of floats, one inner array
/// per input sentence, in input order:
///
/// ```json
/// [[0.03, -0.12, ...], [0.27, 0.01, ...]]
/// ```
///
/// Each inner array has the encoder's hidden dimension and unit L2 norm,
/// except the documented zero-vector case for sentences with no real
/// tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
}

impl EmbedResponse {
    /// Number of embeddings in the response
    pub fn embedding_count(&self) -> usize {
        self.embeddings.len()
    }
}

impl From<Vec<Vec<f32>>> for EmbedResponse {
    fn from(embeddings: Vec<Vec<f32>>) -> Self {
        EmbedResponse { embeddings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_array() {
        let response = EmbedResponse {
            embeddings: vec![vec![0.1, 0.2], vec![0.3, 0.4]],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.starts_with("[["));
        assert!(!json.contains("embeddings"));
    }

    #[test]
    fn test_empty_batch_serializes_as_empty_array() {
        let response = EmbedResponse { embeddings: vec![] };
        assert_eq!(serde_json::to_string(&response).unwrap(), "[]");
    }
}
