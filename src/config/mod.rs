//! Configuration for Glossa.
//!
//! Settings come from `~/.glossa/config.json` when it exists, then from
//! environment variables, which win:
//!
//! | Variable                    | Field                      |
//! |-----------------------------|----------------------------|
//! | `GLOSSA_GLOSSARY_PATH`      | `glossary.path`            |
//! | `GLOSSA_MAX_ENTRIES`        | `glossary.max_entries`     |
//! | `OLLAMA_HOST`               | `ollama.host`              |
//! | `GLOSSA_OLLAMA_MODEL`       | `ollama.model`             |
//! | `GLOSSA_OLLAMA_TEMPERATURE` | `ollama.options.temperature` |
//!
//! # Example
//!
//! ```json
//! {
//!     "glossary": { "path": "/data/entradas_completo.json", "max_entries": 8 },
//!     "ollama": { "host": "http://host.docker.internal:11434", "model": "llama3.2" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GlossaError, Result};

const DEFAULT_MAX_ENTRIES: usize = 10;
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub glossary: GlossaryConfig,
    pub ollama: OllamaConfig,
}

/// Where the glossary lives and how much of it a query may pull in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    /// Path of the glossary JSON file.
    pub path: PathBuf,
    /// Maximum entries handed to the answer generator per question.
    pub max_entries: usize,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            path: Config::dir().join("glossary.json"),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Local Ollama server used for answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Base URL, e.g. `http://localhost:11434`.
    pub host: String,
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub options: OllamaOptions,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            options: OllamaOptions::default(),
        }
    }
}

/// Sampling options forwarded verbatim to Ollama. Unset fields use the
/// model's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u32>,
}

impl Default for OllamaOptions {
    fn default() -> Self {
        Self {
            temperature: Some(0.2),
            top_p: None,
            num_ctx: None,
        }
    }
}

impl Config {
    /// Glossa's home directory (`~/.glossa`).
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".glossa")
    }

    /// Default config file path (`~/.glossa/config.json`).
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path and apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_with_env(&Self::path(), |key| std::env::var(key).ok())
    }

    /// Load from `path` and apply overrides from `lookup`.
    pub fn load_with_env(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_env(lookup)?;
        config.validate();
        Ok(config)
    }

    /// Load a config file. A missing or blank file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            GlossaError::Config(format!(
                "Failed to read config from {}: {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            GlossaError::Config(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("GLOSSA_GLOSSARY_PATH") {
            self.glossary.path = PathBuf::from(path);
        }
        if let Some(max) = get("GLOSSA_MAX_ENTRIES") {
            self.glossary.max_entries = max.trim().parse().map_err(|_| {
                GlossaError::Config(format!(
                    "GLOSSA_MAX_ENTRIES must be a positive integer, got '{}'",
                    max
                ))
            })?;
        }
        if let Some(host) = get("OLLAMA_HOST") {
            self.ollama.host = host;
        }
        if let Some(model) = get("GLOSSA_OLLAMA_MODEL") {
            self.ollama.model = model;
        }
        if let Some(temperature) = get("GLOSSA_OLLAMA_TEMPERATURE") {
            let value: f32 = temperature.trim().parse().map_err(|_| {
                GlossaError::Config(format!(
                    "GLOSSA_OLLAMA_TEMPERATURE must be a number, got '{}'",
                    temperature
                ))
            })?;
            self.ollama.options.temperature = Some(value);
        }

        Ok(())
    }

    fn validate(&mut self) {
        if self.glossary.max_entries == 0 {
            tracing::warn!("glossary.max_entries is 0, using 1");
            self.glossary.max_entries = 1;
        }
    }
}
