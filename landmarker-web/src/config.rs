//! Configuration for landmarker-web
//!
//! TOML config file with environment-variable overrides for secrets.
//! Resolution priority for API keys is ENV over TOML; when a key is present
//! in both sources a warning is logged and the environment value wins.

use landmarker_common::confidence::Thresholds;
use landmarker_common::matching::MatchPolicy;
use landmarker_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable carrying the vision API key
pub const VISION_API_KEY_ENV: &str = "LANDMARKER_VISION_API_KEY";
/// Environment variable carrying the LLM API key
pub const LLM_API_KEY_ENV: &str = "LANDMARKER_LLM_API_KEY";

fn default_bind_address() -> String {
    "127.0.0.1:5731".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("landmarker.db")
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_geocoding_endpoint() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_user_agent() -> String {
    format!("landmarker/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_summary_endpoint() -> String {
    "https://api.together.xyz/v1/chat/completions".to_string()
}

fn default_summary_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.3".to_string()
}

fn default_wikipedia_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

/// Landmark recognizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// API key; the environment variable takes priority over this value
    pub api_key: Option<String>,
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_vision_endpoint(),
            max_results: default_max_results(),
        }
    }
}

/// Reverse-geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Bounded retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First retry delay; doubles per attempt
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            user_agent: default_user_agent(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Summary generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// API key; the environment variable takes priority over this value
    pub api_key: Option<String>,
    #[serde(default = "default_summary_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_summary_model")]
    pub model: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_summary_endpoint(),
            model: default_summary_model(),
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Confidence bucket boundaries (markers and accuracy circles share these)
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Review matching policy
    #[serde(default)]
    pub review_match: MatchPolicy,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default = "default_wikipedia_endpoint")]
    pub wikipedia_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_path: default_database_path(),
            thresholds: Thresholds::default(),
            review_match: MatchPolicy::default(),
            vision: VisionConfig::default(),
            geocoding: GeocodingConfig::default(),
            summary: SummaryConfig::default(),
            wikipedia_endpoint: default_wikipedia_endpoint(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when absent
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No config file given, using defaults");
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Credential(format!("read config {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Credential(format!("parse config {}: {}", path.display(), e)))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

/// Validate API key material (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve an API key from ENV then TOML
///
/// Returns None when neither source carries a usable value; the owning
/// client reports a credential error at the point of use.
pub fn resolve_api_key(env_var: &str, toml_key: Option<&str>, label: &str) -> Option<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k)).map(|k| k.to_string());

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} API key found in both {} and TOML config; using environment (highest priority)",
            label, env_var
        );
    }

    match (env_key, toml_key) {
        (Some(key), _) => {
            info!("{} API key loaded from environment variable", label);
            Some(key)
        }
        (None, Some(key)) => {
            info!("{} API key loaded from TOML config", label);
            Some(key)
        }
        (None, None) => {
            warn!(
                "{} API key not configured. Set {} or add it to the TOML config; \
                 requests needing it will fail with a credential error.",
                label, env_var
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.bind_address, "127.0.0.1:5731");
        assert_eq!(config.thresholds.low_cutoff, 0.35);
        assert_eq!(config.review_match.radius_degrees, 0.1);
        assert_eq!(config.vision.max_results, 10);
        assert_eq!(config.geocoding.max_retries, 2);
        assert!(config.summary.model.contains("Mistral"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            bind_address = "0.0.0.0:8080"

            [thresholds]
            low_cutoff = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.thresholds.low_cutoff, 0.5);
        assert_eq!(config.thresholds.high_cutoff, 0.65);
        assert_eq!(config.review_match.min_name_similarity, 80.0);
    }

    #[test]
    fn load_reads_a_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landmarker.toml");
        std::fs::write(
            &path,
            r#"
            bind_address = "127.0.0.1:9999"

            [summary]
            model = "test-model"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9999");
        assert_eq!(config.summary.model, "test-model");
    }

    #[test]
    fn load_fails_on_missing_file() {
        assert!(Config::load(Some(std::path::Path::new("/no/such/landmarker.toml"))).is_err());
    }

    #[test]
    fn key_validation() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    #[serial]
    fn env_key_beats_toml_key() {
        std::env::set_var("LANDMARKER_TEST_KEY", "from-env");
        let key = resolve_api_key("LANDMARKER_TEST_KEY", Some("from-toml"), "Test");
        assert_eq!(key.as_deref(), Some("from-env"));
        std::env::remove_var("LANDMARKER_TEST_KEY");
    }

    #[test]
    #[serial]
    fn toml_key_used_when_env_absent() {
        std::env::remove_var("LANDMARKER_TEST_KEY");
        let key = resolve_api_key("LANDMARKER_TEST_KEY", Some("from-toml"), "Test");
        assert_eq!(key.as_deref(), Some("from-toml"));
    }

    #[test]
    #[serial]
    fn missing_everywhere_is_none() {
        std::env::remove_var("LANDMARKER_TEST_KEY");
        assert!(resolve_api_key("LANDMARKER_TEST_KEY", None, "Test").is_none());
        assert!(resolve_api_key("LANDMARKER_TEST_KEY", Some("  "), "Test").is_none());
    }
}
