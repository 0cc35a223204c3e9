//! Live adapter for the Gemini image generation API.

use reqwest::Client;
use serde::Deserialize;

use crate::data_uri::DataUri;
use crate::error::GenerationError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResult, ImageGenerator,
};

/// Default API root; `models/{model}:generateContent` is appended.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Live Gemini image generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key, base_url: GEMINI_API_BASE.to_string() }
    }

    /// Point the generator at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

            let body = serde_json::json!({
                "contents": [{
                    "parts": [{"text": request.prompt}]
                }],
                "generationConfig": {
                    "imageConfig": {
                        "aspectRatio": request.aspect_ratio.as_str(),
                    }
                }
            });

            tracing::debug!(model = %request.model, aspect_ratio = %request.aspect_ratio, "sending generateContent request");

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            tracing::debug!(status = status.as_u16(), bytes = response_text.len(), "response received");

            if !status.is_success() {
                return Err(GenerationError::Api { status: status.as_u16(), message: response_text });
            }

            let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
                GenerationError::Api {
                    status: status.as_u16(),
                    message: format!("Failed to parse response: {e}"),
                }
            })?;

            normalize(parsed)
        })
    }
}

/// Reduce a response envelope to a single outcome.
///
/// Only the first candidate is considered. Its first image part wins; failing
/// that, its first text part is treated as the model's refusal.
fn normalize(response: GeminiResponse) -> Result<GenerationResult, GenerationError> {
    let candidate = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(GenerationError::NoCandidates)?;

    let parts = candidate.content.and_then(|c| c.parts).ok_or(GenerationError::NoContentParts)?;

    let mut first_text = None;
    for part in parts {
        match part {
            Part::InlineData { mime_type, data } => {
                return Ok(GenerationResult::Image(DataUri::new(mime_type.as_deref(), data)));
            }
            Part::Text(text) => {
                first_text.get_or_insert(text);
            }
            Part::Other => {}
        }
    }

    if let Some(text) = first_text {
        tracing::warn!(reason = %text, "model returned text instead of an image");
        return Err(GenerationError::Refusal(text));
    }

    tracing::warn!("response carried neither image data nor text");
    Ok(GenerationResult::Empty)
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Option<Vec<Part>>,
}

/// A content part, classified once at the deserialization boundary.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPart")]
enum Part {
    InlineData { mime_type: Option<String>, data: String },
    Text(String),
    Other,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    text: Option<String>,
    inline_data: Option<RawInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInlineData {
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl From<RawPart> for Part {
    fn from(raw: RawPart) -> Self {
        match (raw.inline_data, raw.text) {
            (Some(inline), _) if !inline.data.is_empty() => {
                Self::InlineData { mime_type: inline.mime_type, data: inline.data }
            }
            (_, Some(text)) if !text.is_empty() => Self::Text(text),
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::params::AspectRatio;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn normalize_json(value: serde_json::Value) -> Result<GenerationResult, GenerationError> {
        normalize(serde_json::from_value(value).unwrap())
    }

    fn image(uri: &str) -> GenerationResult {
        GenerationResult::Image(uri.parse().unwrap())
    }

    #[test]
    fn inline_data_with_mime() {
        let result = normalize_json(json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}}
            ]}}]
        }));
        assert_eq!(result.unwrap(), image("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn inline_data_without_mime_defaults_to_png() {
        let result = normalize_json(json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"data": "BBBB"}}]}}]
        }));
        assert_eq!(result.unwrap(), image("data:image/png;base64,BBBB"));
    }

    #[test]
    fn first_image_part_wins() {
        let result = normalize_json(json!({
            "candidates": [{"content": {"parts": [
                {"text": "Here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "FIRST"}},
                {"inlineData": {"mimeType": "image/jpeg", "data": "SECOND"}}
            ]}}]
        }));
        assert_eq!(result.unwrap(), image("data:image/png;base64,FIRST"));
    }

    #[test]
    fn text_only_is_refusal() {
        let result = normalize_json(json!({
            "candidates": [{"content": {"parts": [
                {"text": "I cannot create this."},
                {"text": "Second thoughts."}
            ]}}]
        }));
        match result {
            Err(GenerationError::Refusal(msg)) => assert_eq!(msg, "I cannot create this."),
            other => panic!("expected refusal, got {other:?}"),
        }
    }

    #[test]
    fn empty_inline_data_is_not_an_image() {
        let result = normalize_json(json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": ""}},
                {"text": "blocked"}
            ]}}]
        }));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Refusal);
    }

    #[test]
    fn no_candidates() {
        assert!(matches!(normalize_json(json!({"candidates": []})), Err(GenerationError::NoCandidates)));
        assert!(matches!(normalize_json(json!({})), Err(GenerationError::NoCandidates)));
    }

    #[test]
    fn candidate_without_content_or_parts() {
        assert!(matches!(
            normalize_json(json!({"candidates": [{}]})),
            Err(GenerationError::NoContentParts)
        ));
        assert!(matches!(
            normalize_json(json!({"candidates": [{"content": {"role": "model"}}]})),
            Err(GenerationError::NoContentParts)
        ));
    }

    #[test]
    fn empty_parts_list_is_empty_result() {
        let result = normalize_json(json!({"candidates": [{"content": {"parts": []}}]}));
        assert_eq!(result.unwrap(), GenerationResult::Empty);
    }

    #[test]
    fn parts_without_image_or_text_are_empty() {
        let result = normalize_json(json!({
            "candidates": [{"content": {"parts": [{"thoughtSignature": "xyz"}, {"text": ""}]}}]
        }));
        assert_eq!(result.unwrap(), GenerationResult::Empty);
    }

    #[test]
    fn only_first_candidate_is_considered() {
        let result = normalize_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "nope"}]}},
                {"content": {"parts": [{"inlineData": {"data": "AAAA"}}]}}
            ]
        }));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Refusal);
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "gemini-2.5-flash-image".into(),
            prompt: "a neon robot".into(),
            aspect_ratio: AspectRatio::Landscape16x9,
        }
    }

    #[tokio::test]
    async fn live_call_sends_prompt_and_ratio() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-image:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({
                "contents": [{"parts": [{"text": "a neon robot"}]}],
                "generationConfig": {
                    "imageConfig": {"aspectRatio": "16:9"}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [
                    {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}}
                ]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = GeminiGenerator::new("test-key".into()).with_base_url(server.uri());
        let result = generator.generate(&request()).await.unwrap();
        assert_eq!(result, image("data:image/jpeg;base64,AAAA"));
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .expect(1)
            .mount(&server)
            .await;

        let generator = GeminiGenerator::new("test-key".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(matches!(err, GenerationError::Api { status: 429, ref message } if message == "quota exceeded"));
    }

    #[tokio::test]
    async fn unparseable_body_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let generator = GeminiGenerator::new("test-key".into()).with_base_url(server.uri());
        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let generator =
            GeminiGenerator::new("test-key".into()).with_base_url("http://127.0.0.1:9");
        let err = generator.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Network(_)));
    }
}
