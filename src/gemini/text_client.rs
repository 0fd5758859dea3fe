use super::Endpoint;
use crate::{
    capability::TextCapability,
    error::{ArtError, Result},
    models::{
        gemini::{GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig},
        TextGenerationRequest, TextGenerationResponse,
    },
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct TextClient {
    endpoint: Endpoint,
    model: String,
}

impl TextClient {
    pub fn new(endpoint: Endpoint, model: impl Into<String>) -> Self {
        Self {
            endpoint,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse> {
        let body = build_request_body(&request);

        log::info!("Invoking model: {}", self.model);
        log::debug!("Text generation prompt: {}", request.prompt);

        let response = self.endpoint.generate_content(&self.model, &body).await?;
        into_text_response(&response)
    }
}

#[async_trait]
impl TextCapability for TextClient {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse> {
        self.generate(request).await
    }
}

fn build_request_body(request: &TextGenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![GeminiContent::user(vec![GeminiPart::text(
            request.prompt.clone(),
        )])],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(request.output_schema.clone()),
            ..Default::default()
        }),
        safety_settings: None,
    }
}

fn into_text_response(response: &GenerateContentResponse) -> Result<TextGenerationResponse> {
    let output = match response.text() {
        Some(text) if !text.trim().is_empty() => Some(
            serde_json::from_str(text.trim())
                .map_err(|e| ArtError::ResponseError(format!("Model output is not JSON: {}", e)))?,
        ),
        _ => None,
    };

    Ok(TextGenerationResponse { output })
}
