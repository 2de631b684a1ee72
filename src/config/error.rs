use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading or validating configuration.
pub enum ConfigError {
    /// A required credential was not set in the environment.
    #[error("missing required environment variable: {var}")]
    MissingCredential {
        /// Variable name.
        var: &'static str,
    },

    /// A numeric variable could not be parsed.
    #[error("invalid value '{value}' for {var}: {message}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
        /// Parse error message.
        message: String,
    },

    /// The similarity threshold must lie in [0, 1].
    #[error("similarity threshold {value} outside [0.0, 1.0]")]
    ThresholdOutOfRange {
        /// Offending value.
        value: f32,
    },

    /// A configured path exists but is not a regular file.
    #[error("not a file: {path}")]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },
}
