pub mod image_client;
pub mod text_client;

use crate::{
    config::GeminiConfig,
    error::{ArtError, Result},
    models::gemini::{GenerateContentRequest, GenerateContentResponse, GeminiErrorResponse},
};
use reqwest::Client;
use std::time::Duration;

pub use image_client::ImageClient;
pub use text_client::TextClient;

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
    text_client: TextClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ArtError::ConfigError("GEMINI_API_KEY is required".into()))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ArtError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = Endpoint {
            client: http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        };

        log::info!(
            "Gemini client ready (image: {}, text: {})",
            config.image_model,
            config.text_model
        );

        Ok(Self {
            image_client: ImageClient::new(endpoint.clone(), config.image_model),
            text_client: TextClient::new(endpoint, config.text_model),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }
}

/// Shared HTTP plumbing for both clients.
#[derive(Clone)]
pub struct Endpoint {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Endpoint {
    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    pub(crate) async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        log::debug!("POST generateContent on {}", model);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ArtError::RequestError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ArtError::ResponseError(e.to_string()))?;

        if !status.is_success() {
            log::error!("Gemini returned {} for {}", status, model);
            return Err(api_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ArtError::ResponseError(e.to_string()))
    }
}

fn api_error(status: u16, body: &str) -> ArtError {
    match serde_json::from_str::<GeminiErrorResponse>(body) {
        Ok(parsed) => ArtError::ApiError {
            status,
            message: match parsed.error.status {
                Some(code) => format!("{} ({})", parsed.error.message, code),
                None => parsed.error.message,
            },
        },
        Err(_) => ArtError::ApiError {
            status,
            message: if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}
