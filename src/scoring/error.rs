use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the scoring stage.
pub enum ScoringError {
    /// The scoring configuration file could not be read.
    #[error("failed to read scoring config '{path}': {message}")]
    ConfigReadFailed {
        /// Path that was attempted.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The scoring configuration file is not valid JSON.
    #[error("failed to parse scoring config '{path}': {message}")]
    ConfigParseFailed {
        /// Path that was attempted.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The input detection results could not be parsed.
    #[error("failed to parse detection results: {0}")]
    InputParseFailed(#[from] serde_json::Error),
}
