// Version information for the Sentence Embed Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-batch-embeddings-2026-08-30";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-08-30";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "batch-embeddings",
    "mean-pooling",
    "l2-normalization",
    "cuda-with-cpu-fallback",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Sentence Embed Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
