//! Image generator port for the remote image-generation API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::data_uri::DataUri;
use crate::error::GenerationError;
use crate::params::AspectRatio;

/// A request to generate one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The resolved model identifier (e.g., `"gemini-2.5-flash-image"`).
    pub model: String,
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Requested aspect ratio.
    pub aspect_ratio: AspectRatio,
}

/// Non-failing outcome of a generation call.
///
/// A refusal is reported through [`GenerationError::Refusal`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationResult {
    /// The model produced an image.
    Image(DataUri),
    /// The model produced neither an image nor an explanation.
    Empty,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerationResult, GenerationError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Perform exactly one generation call for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}
