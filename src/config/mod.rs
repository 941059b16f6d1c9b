//! Configuration management.
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `SCHOLAR_HARVEST__<SECTION>__<KEY>` environment variables, in increasing
//! order of precedence.

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::RetryPolicy;

/// Default site every URL is built against
pub const DEFAULT_BASE_URL: &str = "https://scholar.google.com";

/// Config file name probed in the working directory
pub const CONFIG_FILE_NAME: &str = "scholar-harvest.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Retry settings for page fetches
    #[serde(default)]
    pub retry: RetryConfig,

    /// Pauses between sequential requests
    #[serde(default)]
    pub pacing: PacingConfig,

    /// h-index prediction inputs
    #[serde(default)]
    pub prediction: PredictionConfig,

    /// Logging settings (read by the binary)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site origin, or a mirror of it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per page, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

/// Request pacing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause before each coauthor profile fetch, in milliseconds
    #[serde(default = "default_coauthor_pause_ms")]
    pub coauthor_pause_ms: u64,

    /// Mean pause between author-detail fetches, in milliseconds (jittered by ±500)
    #[serde(default = "default_author_detail_delay_ms")]
    pub author_detail_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            coauthor_pause_ms: default_coauthor_pause_ms(),
            author_detail_delay_ms: default_author_detail_delay_ms(),
        }
    }
}

impl PacingConfig {
    /// No pauses at all; for tests and local mirrors
    pub fn none() -> Self {
        Self {
            coauthor_pause_ms: 0,
            author_detail_delay_ms: 0,
        }
    }

    pub fn coauthor_pause(&self) -> Duration {
        Duration::from_millis(self.coauthor_pause_ms)
    }

    pub fn author_detail_delay(&self) -> Duration {
        Duration::from_millis(self.author_detail_delay_ms)
    }
}

fn default_coauthor_pause_ms() -> u64 {
    500
}

fn default_author_detail_delay_ms() -> u64 {
    400
}

/// Prediction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Venues counted as "top" when predicting the h-index
    #[serde(default = "default_top_venues")]
    pub top_venues: Vec<String>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            top_venues: default_top_venues(),
        }
    }
}

/// Top venues used by Acuna et al. (Nature 489, 201-202, 2012)
pub fn default_top_venues() -> Vec<String> {
    [
        "Nature",
        "Science",
        "Nature Neuroscience",
        "Proceedings of the National Academy of Sciences",
        "Neuron",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "json" for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("SCHOLAR_HARVEST").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("scholar-harvest").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.base_url, "https://scholar.google.com");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_ms, 1000);
        assert_eq!(config.pacing.coauthor_pause_ms, 500);
        assert_eq!(config.prediction.top_venues.len(), 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_retry_policy_from_config() {
        let policy = RetryConfig::default().policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[client]
base_url = "https://scholar.example.org"

[retry]
max_attempts = 2
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.client.base_url, "https://scholar.example.org");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay_ms, 1000);
        assert_eq!(config.pacing, PacingConfig::default());
    }
}
