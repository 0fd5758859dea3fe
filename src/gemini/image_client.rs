use super::Endpoint;
use crate::{
    capability::ImageCapability,
    error::Result,
    models::{
        gemini::{GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig},
        ImageGenerationRequest, ImageGenerationResponse, Media, PromptPart,
    },
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct ImageClient {
    endpoint: Endpoint,
    model: String,
}

impl ImageClient {
    pub fn new(endpoint: Endpoint, model: impl Into<String>) -> Self {
        Self {
            endpoint,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[cfg(test)]
    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let body = build_request_body(&request);

        log::info!(
            "Generating image with model: {} ({} part(s), safety: {})",
            self.model,
            request.parts.len(),
            request.safety_settings.is_some()
        );

        let response = self.endpoint.generate_content(&self.model, &body).await?;
        if let Some(reason) = response.block_reason() {
            log::warn!("Image prompt blocked by Gemini: {}", reason);
        }

        Ok(into_image_response(&response))
    }
}

#[async_trait]
impl ImageCapability for ImageClient {
    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        self.generate(request).await
    }
}

fn build_request_body(request: &ImageGenerationRequest) -> GenerateContentRequest {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            PromptPart::Media(uri) => GeminiPart::inline(uri.mime_type(), uri.data()),
            PromptPart::Text(text) => GeminiPart::text(text.clone()),
        })
        .collect();

    GenerateContentRequest {
        contents: vec![GeminiContent::user(parts)],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(request.modalities.clone()),
            ..Default::default()
        }),
        safety_settings: request.safety_settings.clone(),
    }
}

fn into_image_response(response: &GenerateContentResponse) -> ImageGenerationResponse {
    let media = response.first_inline_data().map(|inline| Media {
        url: format!("data:{};base64,{}", inline.mime_type, inline.data),
        content_type: Some(inline.mime_type.clone()),
    });

    ImageGenerationResponse {
        media,
        text: response.text(),
    }
}
