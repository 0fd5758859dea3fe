use super::data_uri::DataUri;
use crate::safety::SafetySetting;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Text,
    Image,
}

/// One ordered piece of a multi-part prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Media(DataUri),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub parts: Vec<PromptPart>,
    pub modalities: Vec<ResponseModality>,
    pub safety_settings: Option<Vec<SafetySetting>>,
}

impl ImageGenerationRequest {
    /// Text-only prompt asking for combined text and image output.
    pub fn from_text(prompt: impl Into<String>) -> Self {
        Self::from_parts(vec![PromptPart::Text(prompt.into())])
    }

    pub fn from_parts(parts: Vec<PromptPart>) -> Self {
        Self {
            parts,
            modalities: vec![ResponseModality::Text, ResponseModality::Image],
            safety_settings: None,
        }
    }

    pub fn with_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = Some(settings);
        self
    }

    pub fn prompt_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            PromptPart::Text(text) => Some(text.as_str()),
            PromptPart::Media(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageGenerationResponse {
    pub media: Option<Media>,
    /// Any text the model returned alongside the image.
    pub text: Option<String>,
}

/// Image produced by the dispatcher, before analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArt {
    pub art_data_uri: String,
}
