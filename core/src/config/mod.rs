//! Configuration management
//!
//! TOML configuration with standard-location discovery: `./textlens.toml`
//! first, then `<config_dir>/textlens/textlens.toml`. Everything has a
//! default so the tool runs with no config file at all; the API key may
//! also come from the `TEXTLENS_API_KEY` environment variable.

use crate::engine::EngineConfig;
use crate::error::{Result, TextLensError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,

    /// Whole-request deadline for one analysis, in seconds. Expiry is
    /// reported as a failed analysis, not a crash.
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the first discovered file, falling back
    /// to defaults when none exists.
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        if config.engine.api_key.is_none() {
            if let Ok(key) = std::env::var("TEXTLENS_API_KEY") {
                if !key.trim().is_empty() {
                    config.engine.api_key = Some(key);
                }
            }
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TextLensError::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(300))
    }
}

/// Find the configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join("textlens.toml");
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = get_config_dir() {
        let path = dir.join("textlens.toml");
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    use dirs::config_dir;
    use home::home_dir;

    if let Some(dir) = config_dir() {
        return Some(dir.join("textlens"));
    }

    if let Some(home) = home_dir() {
        return Some(home.join(".config").join("textlens"));
    }

    None
}

/// Get the data directory path (log files)
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("textlens")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.engine.model, "gpt-4o-mini");
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            request_timeout_secs = 60

            [engine]
            base_url = "http://localhost:11434/v1"
            model = "llama3"
            api_key = "sk-local"
            max_tokens = 512
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.base_url, "http://localhost:11434/v1");
        assert_eq!(config.engine.model, "llama3");
        assert_eq!(config.engine.api_key.as_deref(), Some("sk-local"));
        assert_eq!(config.engine.max_tokens, Some(512));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml_str("[engine]\nmodel = \"custom\"\n").unwrap();
        assert_eq!(config.engine.model, "custom");
        assert_eq!(config.engine.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_malformed_config_is_invalid_config() {
        let err = Config::from_toml_str("engine = 12").unwrap_err();
        assert!(matches!(err, TextLensError::InvalidConfig { .. }));
    }
}
