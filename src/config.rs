//! Service configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment variables. The bind address and database path are overridden
//! last by the binary's `--bind`/`--database` flags, which also read
//! `TODO_BIND_ADDRESS` and `TODO_DATABASE_PATH`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "labeled-todos.yaml";

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const MODEL_ENV: &str = "OPENAI_MODEL";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const CORS_ENV: &str = "TODO_CORS_ORIGINS";

/// Settings for the label suggestion provider.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelerConfig {
    /// API key. Labeling is disabled when absent or blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Full URL of the chat completions endpoint.
    pub base_url: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            max_tokens: 20,
            temperature: 0.2,
            timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for LabelerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LabelerConfig {
    /// The API key, if one is set and not blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on.
    pub bind_address: String,
    /// Path of the `SQLite` database file.
    pub database_path: PathBuf,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Label suggestion settings.
    pub labeler: LabelerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            database_path: PathBuf::from("tasks.db"),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            labeler: LabelerConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file and the environment.
    ///
    /// When `path` is `None`, [`DEFAULT_CONFIG_FILE`] is used if it exists.
    /// An explicitly given path must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a YAML file, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Override labeler settings and CORS origins from environment variables
    /// that are set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.labeler.api_key = Some(key);
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            self.labeler.model = model;
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.labeler.base_url = url;
        }
        if let Ok(origins) = std::env::var(CORS_ENV) {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Parse the bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            Error::Config(format!("invalid bind address '{}': {e}", self.bind_address))
        })
    }
}
