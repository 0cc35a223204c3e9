//! Replaying adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::GenerationError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResult, ImageGenerator,
};

/// Serves recorded generation outcomes from a cassette.
pub struct ReplayingImageGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn next_output(&self) -> Result<serde_json::Value, GenerationError> {
        let mut guard = self
            .replayer
            .lock()
            .map_err(|e| GenerationError::Config(format!("Replayer lock poisoned: {e}")))?;
        guard
            .next_output("image_generator", "generate")
            .map_err(|e| GenerationError::Config(e.to_string()))
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, _request: &GenerationRequest) -> GenerateFuture<'_> {
        let output = self.next_output();
        Box::pin(async move { replay_result::<GenerationResult>(output?) })
    }
}
