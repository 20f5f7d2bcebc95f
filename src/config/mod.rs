//! Configuration management.
//!
//! Configuration comes from environment variables by default, optionally
//! merged with a TOML file:
//!
//! ```toml
//! [ai]
//! api_key = "your-gemini-api-key"
//! model = "gemini-2.5-flash"
//! ```
//!
//! Environment variables with the `SMART_STUDY` prefix override file values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::DEFAULT_MODEL;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AI tier settings
    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
        }
    }
}

/// AI tier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Gemini API key; read from GEMINI_API_KEY or GOOGLE_API_KEY when absent
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Model identifier; read from GEMINI_MODEL when absent
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_model(),
        }
    }
}

impl AiConfig {
    /// Whether a credential is configured for the AI tier
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn default_api_key() -> Option<String> {
    non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("GOOGLE_API_KEY"))
}

fn default_model() -> String {
    non_empty_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("SMART_STUDY").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the default location
pub fn find_config_file() -> Option<PathBuf> {
    let candidate = PathBuf::from("smart-study.toml");
    candidate.exists().then_some(candidate)
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_without_env() {
        // GEMINI_MODEL is unlikely to be set in CI; guard the assumption
        if std::env::var("GEMINI_MODEL").is_err() {
            assert_eq!(default_model(), DEFAULT_MODEL);
        }
    }

    #[test]
    fn test_is_configured_tracks_key_presence() {
        let config = AiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        };
        assert!(!config.is_configured());

        let config = AiConfig {
            api_key: Some("key".to_string()),
            model: DEFAULT_MODEL.to_string(),
        };
        assert!(config.is_configured());
    }
}
