//! Unified error type for neongen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`GenerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The response carried no candidate outputs.
    NoCandidates,
    /// The first candidate had no content or no parts.
    NoContentParts,
    /// The model answered with text instead of an image.
    Refusal,
    /// The call itself failed: network, non-2xx status, unreadable body.
    Transport,
    /// A failure on this side of the wire (config, I/O, arguments).
    Local,
}

/// Errors that can occur during image generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The response contained no candidates.
    #[error("No candidates returned")]
    NoCandidates,

    /// The first candidate had no content parts.
    #[error("No content parts found")]
    NoContentParts,

    /// The model declined to produce an image and said why.
    #[error("{0}")]
    Refusal(String),

    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image decoding or format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured.
    #[error("No Gemini API key. Set {env_var} or add it to the config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },

    /// A failure served from a cassette, displayed exactly as recorded.
    #[error("{message}")]
    Replayed {
        /// Kind of the recorded failure.
        kind: ErrorKind,
        /// Display text of the recorded failure.
        message: String,
    },
}

impl GenerationError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoCandidates => ErrorKind::NoCandidates,
            Self::NoContentParts => ErrorKind::NoContentParts,
            Self::Refusal(_) => ErrorKind::Refusal,
            Self::Api { .. } | Self::Network(_) => ErrorKind::Transport,
            Self::Io(_)
            | Self::Config(_)
            | Self::InvalidArgument(_)
            | Self::ImageConversion(_)
            | Self::MissingApiKey { .. } => ErrorKind::Local,
            Self::Replayed { kind, .. } => *kind,
        }
    }

    /// Rebuild an error from a recorded kind and display message.
    ///
    /// Kinds without a payload ignore `message`. Transport and local failures
    /// come back as [`GenerationError::Replayed`], whose display is `message`
    /// unchanged.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::NoCandidates => Self::NoCandidates,
            ErrorKind::NoContentParts => Self::NoContentParts,
            ErrorKind::Refusal => Self::Refusal(message),
            ErrorKind::Transport | ErrorKind::Local => Self::Replayed { kind, message },
        }
    }
}
