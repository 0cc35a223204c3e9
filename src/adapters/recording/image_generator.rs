//! Recording adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

/// Records each generation call while delegating to an inner generator.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Wrap `inner`, sending every call to `recorder`.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            record_result(&self.recorder, "image_generator", "generate", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;
    use crate::data_uri::DataUri;
    use crate::error::GenerationError;
    use crate::params::AspectRatio;
    use crate::ports::GenerationResult;

    struct Fixed(fn() -> Result<GenerationResult, GenerationError>);

    impl ImageGenerator for Fixed {
        fn generate(&self, _request: &GenerationRequest) -> GenerateFuture<'_> {
            let outcome = (self.0)();
            Box::pin(async move { outcome })
        }
    }

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-2.5-flash-image".into(),
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::Square,
        }
    }

    #[tokio::test]
    async fn records_success_and_refusal() {
        let dir = std::env::temp_dir().join("neongen_recording_adapter_test");
        let path = dir.join("image_generator.cassette.yaml");
        let _ = std::fs::remove_dir_all(&dir);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "rec", "abc")));

        let ok = RecordingImageGenerator::new(
            Box::new(Fixed(|| Ok(GenerationResult::Image(DataUri::new(None, "AAAA"))))),
            Arc::clone(&recorder),
        );
        let refused = RecordingImageGenerator::new(
            Box::new(Fixed(|| Err(GenerationError::Refusal("not today".into())))),
            Arc::clone(&recorder),
        );

        ok.generate(&request("a cat")).await.unwrap();
        refused.generate(&request("a dog")).await.unwrap_err();
        drop((ok, refused));

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&path).unwrap();
        let outputs: Vec<_> = cassette.interactions.iter().map(|i| i.output.clone()).collect();
        assert_eq!(outputs[0]["Ok"]["Image"], "data:image/png;base64,AAAA");
        assert_eq!(outputs[1]["Err"]["kind"], "refusal");
        assert_eq!(outputs[1]["Err"]["message"], "not today");
        assert_eq!(cassette.interactions[1].input["prompt"], "a dog");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
