//! Sequences generation attempts and exposes their progress as observable state.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::data_uri::DataUri;
use crate::error::GenerationError;
use crate::params::AspectRatio;
use crate::ports::{GenerationRequest, GenerationResult, ImageGenerator};

/// Shown when the model returns neither an image nor an explanation.
pub const NO_IMAGE_MESSAGE: &str = "No image data received from the model.";

/// Shown when a failure carries no message of its own.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Visible state of the current session.
///
/// The image is only reachable in `Success` and the error only in `Error`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last attempt produced an image.
    Success {
        /// The generated image.
        image: DataUri,
    },
    /// The last attempt failed.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

/// Discriminant of [`GenerationState`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// See [`GenerationState::Idle`].
    Idle,
    /// See [`GenerationState::Loading`].
    Loading,
    /// See [`GenerationState::Success`].
    Success,
    /// See [`GenerationState::Error`].
    Error,
}

impl GenerationState {
    /// Payload-free status.
    #[must_use]
    pub fn status(&self) -> GenerationStatus {
        match self {
            Self::Idle => GenerationStatus::Idle,
            Self::Loading => GenerationStatus::Loading,
            Self::Success { .. } => GenerationStatus::Success,
            Self::Error { .. } => GenerationStatus::Error,
        }
    }

    /// The generated image, present only on success.
    #[must_use]
    pub fn current_image(&self) -> Option<&DataUri> {
        match self {
            Self::Success { image } => Some(image),
            _ => None,
        }
    }

    /// The error message, present only on failure.
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Why a `generate` call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The prompt was blank after trimming.
    EmptyPrompt,
    /// Another attempt is still in flight.
    InFlight,
}

/// Result of a call to [`GenerationController::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The attempt ran; holds the state it settled in.
    Completed(GenerationState),
    /// No request was sent and the state was left untouched.
    Skipped(SkipReason),
}

/// Owns the session state and drives one generation attempt at a time.
pub struct GenerationController {
    generator: Box<dyn ImageGenerator>,
    model: String,
    state: watch::Sender<GenerationState>,
    latest_attempt: AtomicU64,
}

impl GenerationController {
    /// Create a controller in the `Idle` state.
    #[must_use]
    pub fn new(generator: Box<dyn ImageGenerator>, model: impl Into<String>) -> Self {
        let (state, _) = watch::channel(GenerationState::Idle);
        Self { generator, model: model.into(), state, latest_attempt: AtomicU64::new(0) }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state.subscribe()
    }

    /// Run one generation attempt.
    ///
    /// Blank prompts and calls made while another attempt is loading are
    /// ignored. Otherwise the state moves to `Loading`, the generator is called
    /// once, and the outcome is applied as `Success` or `Error`.
    pub async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Dispatch {
        if prompt.trim().is_empty() {
            tracing::debug!("ignoring generate: prompt is empty");
            return Dispatch::Skipped(SkipReason::EmptyPrompt);
        }

        let Some(attempt) = self.begin() else {
            tracing::debug!("ignoring generate: an attempt is already in flight");
            return Dispatch::Skipped(SkipReason::InFlight);
        };

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            aspect_ratio,
        };
        tracing::debug!(attempt, %aspect_ratio, "generation started");

        let outcome = self.generator.generate(&request).await;
        self.finish(attempt, outcome);
        Dispatch::Completed(self.state())
    }

    /// Enter `Loading` unless already there, returning the new attempt number.
    fn begin(&self) -> Option<u64> {
        let mut attempt = None;
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = GenerationState::Loading;
            attempt = Some(self.latest_attempt.fetch_add(1, Ordering::SeqCst) + 1);
            true
        });
        attempt
    }

    /// Apply an attempt's outcome if it is still the latest one in flight.
    fn finish(&self, attempt: u64, outcome: Result<GenerationResult, GenerationError>) {
        let next = match outcome {
            Ok(GenerationResult::Image(image)) => GenerationState::Success { image },
            Ok(GenerationResult::Empty) => {
                tracing::info!(attempt, kind = "empty", "generation failed: no image data");
                GenerationState::Error { message: NO_IMAGE_MESSAGE.to_string() }
            }
            Err(e) => {
                tracing::info!(attempt, kind = ?e.kind(), error = %e, "generation failed");
                let message = e.to_string();
                let message = if message.is_empty() {
                    UNEXPECTED_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                GenerationState::Error { message }
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if !state.is_loading() || self.latest_attempt.load(Ordering::SeqCst) != attempt {
                return false;
            }
            *state = next;
            true
        });

        if applied {
            tracing::debug!(attempt, "generation finished");
        } else {
            tracing::warn!(attempt, "dropping result of a superseded attempt");
        }
    }
}
