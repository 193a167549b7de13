//! Configuration loading
//!
//! Layers an optional TOML file under `JOURNAL__`-prefixed environment
//! variables (double-underscore separated, e.g. `JOURNAL__LLM__API_KEY`).
//! Every section has serde defaults so a missing file still yields a
//! runnable config; secrets are expected from the environment.

use serde::Deserialize;

use crate::error::{JournalError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// HTTP server binding
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Trade store location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// Coach LLM provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// "groq", "openai", "ollama", or any OpenAI-compatible endpoint
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// User preference storage
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    #[serde(default = "default_theme_path")]
    pub theme_path: String,
}

impl Config {
    /// Load configuration from a TOML file (optional) plus environment
    pub fn load(path: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("JOURNAL").separator("__"))
            .build()
            .map_err(|e| JournalError::Config(e.to_string()))?;

        cfg.try_deserialize()
            .map_err(|e| JournalError::Config(e.to_string()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            model: None,
            base_url: None,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            theme_path: default_theme_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "data/journal.db".to_string()
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_theme_path() -> String {
    "data/theme.json".to_string()
}
