//! Capability doubles that record every request and replay scripted answers.

use crate::{
    capability::{ImageCapability, TextCapability},
    error::{ArtError, Result},
    models::{
        ImageGenerationRequest, ImageGenerationResponse, Media, TextGenerationRequest,
        TextGenerationResponse,
    },
};
use async_trait::async_trait;
use serde_json::json;
use std::{collections::VecDeque, sync::Mutex};

pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Scripted responses are used first; after that every call gets `fallback`.
struct Script<Req, Resp> {
    calls: Mutex<Vec<Req>>,
    queue: Mutex<VecDeque<Result<Resp>>>,
    fallback: Option<Resp>,
}

impl<Req: Clone, Resp: Clone> Script<Req, Resp> {
    fn new(queue: Vec<Result<Resp>>, fallback: Option<Resp>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            queue: Mutex::new(queue.into()),
            fallback,
        }
    }

    fn answer(&self, request: Req) -> Result<Resp> {
        self.calls.lock().unwrap().push(request);
        match self.queue.lock().unwrap().pop_front() {
            Some(scripted) => scripted,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ArtError::RequestError("no scripted response left".into())),
        }
    }

    fn calls(&self) -> Vec<Req> {
        self.calls.lock().unwrap().clone()
    }
}

pub struct RecordingImageCapability {
    script: Script<ImageGenerationRequest, ImageGenerationResponse>,
}

impl RecordingImageCapability {
    pub fn returning_image() -> Self {
        Self {
            script: Script::new(
                Vec::new(),
                Some(ImageGenerationResponse {
                    media: Some(Media {
                        url: PNG_DATA_URI.to_string(),
                        content_type: Some("image/png".to_string()),
                    }),
                    text: None,
                }),
            ),
        }
    }

    pub fn responding(response: Result<ImageGenerationResponse>) -> Self {
        Self {
            script: Script::new(vec![response], None),
        }
    }

    pub fn calls(&self) -> Vec<ImageGenerationRequest> {
        self.script.calls()
    }
}

#[async_trait]
impl ImageCapability for RecordingImageCapability {
    async fn generate_image(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse> {
        self.script.answer(request)
    }
}

pub struct RecordingTextCapability {
    script: Script<TextGenerationRequest, TextGenerationResponse>,
}

impl RecordingTextCapability {
    pub fn returning_analysis(text: &str) -> Self {
        Self {
            script: Script::new(
                Vec::new(),
                Some(TextGenerationResponse {
                    output: Some(json!({ "textualAnalysis": text })),
                }),
            ),
        }
    }

    pub fn responding(response: Result<TextGenerationResponse>) -> Self {
        Self {
            script: Script::new(vec![response], None),
        }
    }

    pub fn calls(&self) -> Vec<TextGenerationRequest> {
        self.script.calls()
    }
}

#[async_trait]
impl TextCapability for RecordingTextCapability {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse> {
        self.script.answer(request)
    }
}
