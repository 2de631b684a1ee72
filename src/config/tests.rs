use super::*;
use serial_test::serial;

const ALL_VARS: &[&str] = &[
    "LINTEL_GRAPH_URI",
    "LINTEL_GRAPH_USER",
    "LINTEL_GRAPH_PASSWORD",
    "LINTEL_EMBED_BASE_URL",
    "LINTEL_EMBED_API_KEY",
    "LINTEL_EMBED_MODEL",
    "LINTEL_GENERATION_MODEL",
    "LINTEL_SIMILARITY_THRESHOLD",
    "LINTEL_SEMANTIC_TOP_K",
    "LINTEL_EMBED_CACHE_CAPACITY",
    "LINTEL_SCORING_CONFIG",
];

fn clear_env() {
    for var in ALL_VARS {
        unsafe { std::env::remove_var(var) };
    }
}

fn set_credentials() {
    unsafe {
        std::env::set_var("LINTEL_GRAPH_PASSWORD", "secret");
        std::env::set_var("LINTEL_EMBED_API_KEY", "sk-test");
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    set_credentials();

    let config = Config::from_env().expect("config should load with credentials set");

    assert_eq!(config.graph_uri, DEFAULT_GRAPH_URI);
    assert_eq!(config.graph_user, "neo4j");
    assert_eq!(config.embed_base_url, DEFAULT_EMBED_BASE_URL);
    assert_eq!(config.embed_model, "text-embedding-3-large");
    assert_eq!(config.similarity_threshold, 0.5);
    assert_eq!(config.semantic_top_k, 20);
    assert_eq!(config.embed_cache_capacity, 1000);
    assert!(config.scoring_config_path.is_none());
}

#[test]
#[serial]
fn test_missing_graph_password_is_fatal() {
    clear_env();
    unsafe { std::env::set_var("LINTEL_EMBED_API_KEY", "sk-test") };

    let err = Config::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingCredential {
            var: "LINTEL_GRAPH_PASSWORD"
        }
    ));
}

#[test]
#[serial]
fn test_missing_embed_key_is_fatal() {
    clear_env();
    unsafe { std::env::set_var("LINTEL_GRAPH_PASSWORD", "secret") };

    let err = Config::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingCredential {
            var: "LINTEL_EMBED_API_KEY"
        }
    ));
}

#[test]
#[serial]
fn test_threshold_override_and_range_check() {
    clear_env();
    set_credentials();
    unsafe { std::env::set_var("LINTEL_SIMILARITY_THRESHOLD", "0.3") };

    let config = Config::from_env().unwrap();
    assert_eq!(config.similarity_threshold, 0.3);

    unsafe { std::env::set_var("LINTEL_SIMILARITY_THRESHOLD", "1.5") };
    let err = Config::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ThresholdOutOfRange { value } if value == 1.5
    ));
}

#[test]
#[serial]
fn test_invalid_numeric_value() {
    clear_env();
    set_credentials();
    unsafe { std::env::set_var("LINTEL_SEMANTIC_TOP_K", "twenty") };

    let err = Config::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            var: "LINTEL_SEMANTIC_TOP_K",
            ..
        }
    ));
}

#[test]
#[serial]
fn test_whitespace_credential_treated_as_missing() {
    clear_env();
    unsafe {
        std::env::set_var("LINTEL_GRAPH_PASSWORD", "   ");
        std::env::set_var("LINTEL_EMBED_API_KEY", "sk-test");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredential { .. }));
}
