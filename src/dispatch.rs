use crate::{
    capability::ImageCapability,
    error::{ArtError, Result},
    models::{DataUri, GenerationRequest, GeneratedArt, ImageGenerationRequest, PromptPart},
    prompt::{synthesize_style_guided_prompt, synthesize_unconditioned_prompt},
    safety::style_guided_policy,
};
use std::{fmt, sync::Arc};

pub const NO_CONTENT_MESSAGE: &str = "Image generation failed or returned no content.";
pub const MISSING_REFERENCE_MESSAGE: &str = "Style-guided generation requires a style reference.";

/// The two mutually exclusive ways to produce an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    Unconditioned,
    StyleGuided,
}

impl GenerationStrategy {
    pub fn select(request: &GenerationRequest) -> Self {
        if request.has_style_reference() {
            GenerationStrategy::StyleGuided
        } else {
            GenerationStrategy::Unconditioned
        }
    }

    /// Model payload for this strategy. Reference media always precedes the text.
    /// A style-guided payload cannot be built for a request without a reference.
    pub fn build(&self, request: &GenerationRequest) -> Result<ImageGenerationRequest> {
        match (self, request.style()) {
            (GenerationStrategy::Unconditioned, _) => Ok(ImageGenerationRequest::from_text(
                synthesize_unconditioned_prompt(
                    request.prompt(),
                    request.artistic_movement(),
                    request.color_mood(),
                ),
            )),
            (GenerationStrategy::StyleGuided, Some(style)) => {
                let text = synthesize_style_guided_prompt(
                    request.prompt(),
                    request.artistic_movement(),
                    request.color_mood(),
                    style.strength,
                );
                Ok(ImageGenerationRequest::from_parts(vec![
                    PromptPart::Media(style.reference.clone()),
                    PromptPart::Text(text),
                ])
                .with_safety_settings(style_guided_policy()))
            }
            (GenerationStrategy::StyleGuided, None) => Err(ArtError::GenerationFailure(
                MISSING_REFERENCE_MESSAGE.to_string(),
            )),
        }
    }

    pub async fn invoke(
        &self,
        request: &GenerationRequest,
        capability: &dyn ImageCapability,
    ) -> Result<GeneratedArt> {
        let response = capability
            .generate_image(self.build(request)?)
            .await
            .map_err(|e| ArtError::GenerationFailure(e.to_string()))?;

        match response.media {
            Some(media) if is_resolvable(&media.url) => Ok(GeneratedArt {
                art_data_uri: media.url,
            }),
            _ => Err(ArtError::GenerationFailure(NO_CONTENT_MESSAGE.to_string())),
        }
    }
}

/// A self-contained data URI whose payload decodes to at least one byte.
fn is_resolvable(url: &str) -> bool {
    DataUri::parse(url)
        .and_then(|uri| uri.decode())
        .map_or(false, |bytes| !bytes.is_empty())
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStrategy::Unconditioned => write!(f, "unconditioned"),
            GenerationStrategy::StyleGuided => write!(f, "style-guided"),
        }
    }
}

/// Picks a strategy per request and runs it once. No retries.
#[derive(Clone)]
pub struct Dispatcher {
    capability: Arc<dyn ImageCapability>,
}

impl Dispatcher {
    pub fn new(capability: Arc<dyn ImageCapability>) -> Self {
        Self { capability }
    }

    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<GeneratedArt> {
        let strategy = GenerationStrategy::select(request);
        log::info!("🎨 Dispatching {} generation", strategy);

        let result = strategy.invoke(request, self.capability.as_ref()).await;
        if let Err(e) = &result {
            log::error!("❌ {} generation failed: {}", strategy, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageGenerationResponse, Media, RawSubmission};
    use crate::test_support::{RecordingImageCapability, PNG_DATA_URI};

    fn request(raw: RawSubmission) -> GenerationRequest {
        GenerationRequest::validate(&raw).unwrap()
    }

    #[test]
    fn strategy_follows_reference_presence() {
        let plain = request(RawSubmission::new("Rain on glass"));
        assert_eq!(GenerationStrategy::select(&plain), GenerationStrategy::Unconditioned);

        let styled = request(RawSubmission::new("Rain on glass").with_style_reference(PNG_DATA_URI));
        assert_eq!(GenerationStrategy::select(&styled), GenerationStrategy::StyleGuided);
    }

    #[test]
    fn style_guided_build_needs_a_reference() {
        let plain = request(RawSubmission::new("Rain on glass"));
        match GenerationStrategy::StyleGuided.build(&plain) {
            Err(ArtError::GenerationFailure(message)) => {
                assert_eq!(message, MISSING_REFERENCE_MESSAGE)
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let styled = request(RawSubmission::new("Rain on glass").with_style_reference(PNG_DATA_URI));
        let payload = GenerationStrategy::Unconditioned.build(&styled).unwrap();
        assert_eq!(payload.parts.len(), 1);
        assert!(payload.safety_settings.is_none());
    }

    #[tokio::test]
    async fn unconditioned_sends_text_only_without_safety() {
        let capability = Arc::new(RecordingImageCapability::returning_image());
        let dispatcher = Dispatcher::new(capability.clone());

        let art = dispatcher
            .dispatch(&request(
                RawSubmission::new("A cubist jazz band at night")
                    .with_artistic_movement("Cubism")
                    .with_color_mood("Vibrant"),
            ))
            .await
            .unwrap();
        assert_eq!(art.art_data_uri, PNG_DATA_URI);

        let calls = capability.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].parts.len(), 1);
        assert!(calls[0].safety_settings.is_none());
        let text = calls[0].prompt_text().unwrap();
        assert!(text.contains("Cubism"));
        assert!(text.contains("Vibrant"));
    }

    #[tokio::test]
    async fn style_guided_puts_reference_first_and_attaches_policy() {
        let capability = Arc::new(RecordingImageCapability::returning_image());
        let dispatcher = Dispatcher::new(capability.clone());

        dispatcher
            .dispatch(&request(
                RawSubmission::new("A cubist jazz band at night")
                    .with_style_reference(PNG_DATA_URI)
                    .with_style_strength(75),
            ))
            .await
            .unwrap();

        let calls = capability.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0].parts[..] {
            [PromptPart::Media(reference), PromptPart::Text(text)] => {
                assert_eq!(reference.to_string(), PNG_DATA_URI);
                assert!(text.contains("75"));
            }
            other => panic!("unexpected parts: {:?}", other),
        }
        assert_eq!(calls[0].safety_settings, Some(style_guided_policy()));
    }

    #[tokio::test]
    async fn missing_media_is_a_generation_failure() {
        for response in [
            ImageGenerationResponse::default(),
            ImageGenerationResponse {
                media: Some(Media {
                    url: String::new(),
                    content_type: None,
                }),
                text: None,
            },
            ImageGenerationResponse {
                media: Some(Media {
                    url: "data:image/png;base64,".to_string(),
                    content_type: Some("image/png".to_string()),
                }),
                text: None,
            },
            ImageGenerationResponse {
                media: Some(Media {
                    url: "data:image/png;base64,@@not-base64@@".to_string(),
                    content_type: Some("image/png".to_string()),
                }),
                text: None,
            },
        ] {
            let dispatcher = Dispatcher::new(Arc::new(RecordingImageCapability::responding(Ok(response))));
            let err = dispatcher
                .dispatch(&request(RawSubmission::new("Rain on glass")))
                .await
                .unwrap_err();
            match err {
                ArtError::GenerationFailure(message) => assert_eq!(message, NO_CONTENT_MESSAGE),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn capability_errors_become_generation_failures() {
        let capability = Arc::new(RecordingImageCapability::responding(Err(ArtError::ApiError {
            status: 500,
            message: "internal".into(),
        })));
        let dispatcher = Dispatcher::new(capability.clone());
        let err = dispatcher
            .dispatch(&request(RawSubmission::new("Rain on glass").with_style_reference(PNG_DATA_URI)))
            .await
            .unwrap_err();
        assert!(matches!(err, ArtError::GenerationFailure(_)));
        assert_eq!(capability.calls().len(), 1);
    }
}
