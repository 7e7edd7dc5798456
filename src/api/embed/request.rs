// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for the POST /embed endpoint

use serde::{Deserialize, Serialize};

/// Request body for POST /embed
///
/// # Example
/// ```json
/// { "sentences": ["Hello world", "Another sentence"] }
/// ```
///
/// An empty `sentences` array is valid and yields an empty response
/// array. Batch size is bounded only by device memory; there is no
/// admission control in this minimal design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Sentences to embed, output is returned in the same order
    pub sentences: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization() {
        let json = r#"{"sentences": ["hello world", "hi"]}"#;
        let req: EmbedRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.sentences.len(), 2);
        assert_eq!(req.sentences[0], "hello world");
    }

    #[test]
    fn test_empty_list_is_valid() {
        let json = r#"{"sentences": []}"#;
        let req: EmbedRequest = serde_json::from_str(json).unwrap();
        assert!(req.sentences.is_empty());
    }

    #[test]
    fn test_missing_key_rejected() {
        let json = r#"{"texts": ["hello"]}"#;
        assert!(serde_json::from_str::<EmbedRequest>(json).is_err());
    }

    #[test]
    fn test_non_string_elements_rejected() {
        let json = r#"{"sentences": ["ok", 42]}"#;
        assert!(serde_json::from_str::<EmbedRequest>(json).is_err());
    }
}
