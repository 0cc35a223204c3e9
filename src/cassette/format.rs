//! On-disk cassette layout.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reading, writing, or consuming a cassette.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The file could not be read or written.
    #[error("cassette {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not a valid cassette.
    #[error("cassette {path}: {source}")]
    Yaml {
        /// File involved.
        path: String,
        /// Underlying error.
        source: serde_yaml::Error,
    },

    /// Every recorded call for this port/method has been served.
    #[error("cassette exhausted: no more interactions for {port}::{method}")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
    },
}

/// A recorded session: every port call made during one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable name, usually `<timestamp>-<port>`.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Recorded calls, in call order.
    pub interactions: Vec<Interaction>,
}

/// One port call and its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the recording.
    pub seq: u64,
    /// Port name, e.g. `image_generator`.
    pub port: String,
    /// Method name on the port.
    pub method: String,
    /// Serialized call input.
    pub input: serde_json::Value,
    /// `{"Ok": ...}` or `{"Err": {"kind": ..., "message": ...}}`.
    pub output: serde_json::Value,
}

impl Cassette {
    /// Read a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|source| CassetteError::Io { path: display.clone(), source })?;
        serde_yaml::from_str(&content).map_err(|source| CassetteError::Yaml { path: display, source })
    }

    /// Write the cassette as YAML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CassetteError> {
        let display = path.display().to_string();
        let yaml = serde_yaml::to_string(self)
            .map_err(|source| CassetteError::Yaml { path: display.clone(), source })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| CassetteError::Io { path: display.clone(), source })?;
        }
        std::fs::write(path, yaml).map_err(|source| CassetteError::Io { path: display, source })
    }
}
