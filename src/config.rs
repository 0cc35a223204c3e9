//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Defaults used when the matching CLI flag is not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Endpoint overrides.
    #[serde(default)]
    pub api: ApiConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default aspect ratio.
    pub aspect_ratio: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { model: "nano-banana".to_string(), aspect_ratio: "16:9".to_string() }
    }
}

/// Endpoint overrides, mostly useful against proxies and mock servers.
#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    /// API root replacing the public Gemini endpoint.
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key.
    ///
    /// `GEMINI_API_KEY` wins, then `API_KEY`, then the config file.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        ["GEMINI_API_KEY", "API_KEY"]
            .into_iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
            .or_else(|| self.keys.gemini.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `NEONGEN_CONFIG` environment variable
/// 3. `~/.config/neongen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("NEONGEN_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".config/neongen/config.toml"),
        Err(_) => PathBuf::from("neongen.toml"),
    }
}
