use crate::{
    error::Result,
    models::{
        ImageGenerationRequest, ImageGenerationResponse, TextGenerationRequest,
        TextGenerationResponse,
    },
};
use async_trait::async_trait;

/// A model that turns prompt parts into an image.
#[async_trait]
pub trait ImageCapability: Send + Sync {
    async fn generate_image(&self, request: ImageGenerationRequest)
        -> Result<ImageGenerationResponse>;
}

/// A model that answers a prompt with JSON matching a schema.
#[async_trait]
pub trait TextCapability: Send + Sync {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse>;
}
