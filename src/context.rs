//! Chooses which `ImageGenerator` backs a session.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::Cassette;
use crate::config::Config;
use crate::error::GenerationError;
use crate::ports::ImageGenerator;

/// Where recordings are written, relative to the working directory.
const CASSETTE_DIR: &str = ".neongen/cassettes";

/// Bundles the port implementations for one run.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette to disk.
    ///
    /// Every generator wrapping the recorder must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be
    /// written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context talking to Gemini.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn live(config: &Config) -> Result<Self, GenerationError> {
        let key = config
            .gemini_key()
            .ok_or_else(|| GenerationError::MissingApiKey { env_var: "GEMINI_API_KEY".into() })?;
        let mut generator = GeminiGenerator::new(key);
        if let Some(ref base_url) = config.api.base_url {
            generator = generator.with_base_url(base_url);
        }
        Ok(Self { generator: Box::new(generator) })
    }

    /// Create a live context whose calls are recorded to a new cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), GenerationError> {
        let live = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(CASSETTE_DIR)
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_generator"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live.generator, Arc::clone(&recorder));
        Ok((Self { generator: Box::new(generator) }, RecordingSession { recorder }))
    }

    /// Create a context that replays a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, GenerationError> {
        let cassette = Cassette::load(path)
            .map_err(|e| GenerationError::Config(format!("Failed to load cassette: {e}")))?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(cassette)));
        Ok(Self { generator: Box::new(ReplayingImageGenerator::new(replayer)) })
    }
}

/// Current git commit, or "unknown" outside a repository.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
