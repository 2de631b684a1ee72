//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `LINTEL_*` environment variables.
//! Credentials (`LINTEL_GRAPH_PASSWORD`, `LINTEL_EMBED_API_KEY`) have no
//! defaults and are validated eagerly: a missing credential is fatal at
//! startup, never at first use.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LINTEL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bolt endpoint of the knowledge-graph store. Default: `bolt://localhost:7687`.
    pub graph_uri: String,

    /// Graph store username. Default: `neo4j`.
    pub graph_user: String,

    /// Graph store password. Required.
    pub graph_password: String,

    /// Base URL of the embedding service (OpenAI-compatible).
    /// Default: `https://api.openai.com/v1`.
    pub embed_base_url: String,

    /// Embedding service API key. Required.
    pub embed_api_key: String,

    /// Embedding model identifier. Default: `text-embedding-3-large`.
    pub embed_model: String,

    /// Text-generation model identifier. Default: `gpt-4o-mini`.
    pub generation_model: String,

    /// Minimum cosine similarity for the semantic retrieval path. Default: `0.5`.
    pub similarity_threshold: f32,

    /// Similar-node limit per entity for the semantic retrieval path. Default: `20`.
    pub semantic_top_k: usize,

    /// Max entries held by the embedding cache before a flush. Default: `1000`.
    pub embed_cache_capacity: usize,

    /// Optional path to a scoring-weights JSON file. When unset, compiled-in
    /// defaults are used.
    pub scoring_config_path: Option<PathBuf>,
}

/// Default graph endpoint used when `LINTEL_GRAPH_URI` is not set.
pub const DEFAULT_GRAPH_URI: &str = "bolt://localhost:7687";

/// Default embedding endpoint used when `LINTEL_EMBED_BASE_URL` is not set.
pub const DEFAULT_EMBED_BASE_URL: &str = "https://api.openai.com/v1";

impl Config {
    const ENV_GRAPH_URI: &'static str = "LINTEL_GRAPH_URI";
    const ENV_GRAPH_USER: &'static str = "LINTEL_GRAPH_USER";
    const ENV_GRAPH_PASSWORD: &'static str = "LINTEL_GRAPH_PASSWORD";
    const ENV_EMBED_BASE_URL: &'static str = "LINTEL_EMBED_BASE_URL";
    const ENV_EMBED_API_KEY: &'static str = "LINTEL_EMBED_API_KEY";
    const ENV_EMBED_MODEL: &'static str = "LINTEL_EMBED_MODEL";
    const ENV_GENERATION_MODEL: &'static str = "LINTEL_GENERATION_MODEL";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "LINTEL_SIMILARITY_THRESHOLD";
    const ENV_SEMANTIC_TOP_K: &'static str = "LINTEL_SEMANTIC_TOP_K";
    const ENV_EMBED_CACHE_CAPACITY: &'static str = "LINTEL_EMBED_CACHE_CAPACITY";
    const ENV_SCORING_CONFIG: &'static str = "LINTEL_SCORING_CONFIG";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let graph_uri =
            Self::parse_string_from_env(Self::ENV_GRAPH_URI, DEFAULT_GRAPH_URI.to_string());
        let graph_user = Self::parse_string_from_env(Self::ENV_GRAPH_USER, "neo4j".to_string());
        let graph_password = Self::parse_required_from_env(Self::ENV_GRAPH_PASSWORD)?;
        let embed_base_url = Self::parse_string_from_env(
            Self::ENV_EMBED_BASE_URL,
            DEFAULT_EMBED_BASE_URL.to_string(),
        );
        let embed_api_key = Self::parse_required_from_env(Self::ENV_EMBED_API_KEY)?;
        let embed_model = Self::parse_string_from_env(
            Self::ENV_EMBED_MODEL,
            "text-embedding-3-large".to_string(),
        );
        let generation_model =
            Self::parse_string_from_env(Self::ENV_GENERATION_MODEL, "gpt-4o-mini".to_string());
        let similarity_threshold =
            Self::parse_f32_from_env(Self::ENV_SIMILARITY_THRESHOLD, 0.5)?;
        let semantic_top_k = Self::parse_usize_from_env(Self::ENV_SEMANTIC_TOP_K, 20)?;
        let embed_cache_capacity =
            Self::parse_usize_from_env(Self::ENV_EMBED_CACHE_CAPACITY, 1000)?;
        let scoring_config_path = Self::parse_optional_path_from_env(Self::ENV_SCORING_CONFIG);

        let config = Self {
            graph_uri,
            graph_user,
            graph_password,
            embed_base_url,
            embed_api_key,
            embed_model,
            generation_model,
            similarity_threshold,
            semantic_top_k,
            embed_cache_capacity,
            scoring_config_path,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validates value ranges and referenced paths (does not open connections).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.similarity_threshold,
            });
        }

        if let Some(ref path) = self.scoring_config_path {
            if path.exists() && !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    fn parse_required_from_env(var: &'static str) -> Result<String, ConfigError> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential { var })
    }

    fn parse_string_from_env(var: &str, default: String) -> String {
        env::var(var).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var: &str) -> Option<PathBuf> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_f32_from_env(var: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var) {
            Ok(value) => value.parse().map_err(|e: std::num::ParseFloatError| {
                ConfigError::InvalidValue {
                    var,
                    value,
                    message: e.to_string(),
                }
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var) {
            Ok(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var,
                    value,
                    message: e.to_string(),
                }
            }),
            Err(_) => Ok(default),
        }
    }
}
