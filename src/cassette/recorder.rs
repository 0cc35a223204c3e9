//! Collects interactions during a live run and writes them out at the end.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, CassetteError, Interaction};

/// Accumulates interactions for one cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path` when finished.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self { path: path.into(), name: name.into(), commit: commit.into(), interactions: Vec::new() }
    }

    /// Append an interaction; `seq` follows call order.
    pub fn record(
        &mut self,
        port: &str,
        method: &str,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Write the cassette and return where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, CassetteError> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        cassette.save(&self.path)?;
        Ok(self.path)
    }
}
