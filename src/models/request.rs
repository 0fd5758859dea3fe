use super::data_uri::DataUri;
use crate::error::FieldErrors;
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_STYLE_STRENGTH: f64 = 0.0;
pub const MAX_STYLE_STRENGTH: f64 = 100.0;

/// A submission exactly as the form sends it. Every field is untrusted text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub prompt: Option<String>,
    pub style_reference: Option<String>,
    pub artistic_movement: Option<String>,
    pub color_mood: Option<String>,
    /// Forms send text, JSON clients often send a number. Both are kept as text.
    #[serde(default, deserialize_with = "number_or_text")]
    pub style_strength: Option<String>,
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(
        Option::<NumberOrText>::deserialize(deserializer)?.map(|value| match value {
            NumberOrText::Number(number) => number.to_string(),
            NumberOrText::Text(text) => text,
        }),
    )
}

impl RawSubmission {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn with_style_reference(mut self, data_uri: impl Into<String>) -> Self {
        self.style_reference = Some(data_uri.into());
        self
    }

    pub fn with_artistic_movement(mut self, movement: impl Into<String>) -> Self {
        self.artistic_movement = Some(movement.into());
        self
    }

    pub fn with_color_mood(mut self, mood: impl Into<String>) -> Self {
        self.color_mood = Some(mood.into());
        self
    }

    pub fn with_style_strength(mut self, strength: impl ToString) -> Self {
        self.style_strength = Some(strength.to_string());
        self
    }
}

/// Reference image plus how strongly to apply it.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleGuide {
    pub reference: DataUri,
    pub strength: Option<f64>,
}

/// A validated submission. Constructed only through [`GenerationRequest::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    artistic_movement: Option<String>,
    color_mood: Option<String>,
    style: Option<StyleGuide>,
}

impl GenerationRequest {
    pub fn validate(raw: &RawSubmission) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let prompt = match raw.prompt.as_deref() {
            Some(p) if !p.trim().is_empty() => Some(p.to_string()),
            _ => {
                push_error(&mut errors, "prompt", "Prompt cannot be empty.");
                None
            }
        };

        let strength = match present(&raw.style_strength) {
            None => None,
            Some(text) => match text.trim().parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    push_error(&mut errors, "styleStrength", "Style strength must be a number.");
                    None
                }
                Ok(value) if !(MIN_STYLE_STRENGTH..=MAX_STYLE_STRENGTH).contains(&value) => {
                    push_error(
                        &mut errors,
                        "styleStrength",
                        "Style strength must be between 0 and 100.",
                    );
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    push_error(&mut errors, "styleStrength", "Style strength must be a number.");
                    None
                }
            },
        };

        let reference = match present(&raw.style_reference) {
            None => None,
            Some(uri) => match DataUri::parse(uri) {
                Ok(parsed) if parsed.is_image() && parsed.decode().is_ok() => Some(parsed),
                _ => {
                    push_error(
                        &mut errors,
                        "styleReference",
                        "Style reference must be a base64-encoded image data URI.",
                    );
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        if reference.is_none() && strength.is_some() {
            log::debug!("Ignoring style strength submitted without a style reference");
        }

        Ok(Self {
            // Present whenever errors is empty.
            prompt: prompt.unwrap_or_default(),
            artistic_movement: present(&raw.artistic_movement).map(String::from),
            color_mood: present(&raw.color_mood).map(String::from),
            style: reference.map(|reference| StyleGuide { reference, strength }),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn artistic_movement(&self) -> Option<&str> {
        self.artistic_movement.as_deref()
    }

    pub fn color_mood(&self) -> Option<&str> {
        self.color_mood.as_deref()
    }

    pub fn style(&self) -> Option<&StyleGuide> {
        self.style.as_ref()
    }

    pub fn style_reference(&self) -> Option<&DataUri> {
        self.style.as_ref().map(|style| &style.reference)
    }

    pub fn style_strength(&self) -> Option<f64> {
        self.style.as_ref().and_then(|style| style.strength)
    }

    pub fn has_style_reference(&self) -> bool {
        self.style.is_some()
    }

    /// Strength echoed back to the caller: 0 unless a reference drove the generation.
    pub fn style_strength_applied(&self) -> f64 {
        self.style_strength().unwrap_or(0.0)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[test]
    fn blank_prompt_is_rejected() {
        for prompt in ["", "   ", "\n\t"] {
            let errors = GenerationRequest::validate(&RawSubmission::new(prompt)).unwrap_err();
            assert_eq!(errors["prompt"], vec!["Prompt cannot be empty.".to_string()]);
        }
        let errors = GenerationRequest::validate(&RawSubmission::default()).unwrap_err();
        assert!(errors.contains_key("prompt"));
    }

    #[test]
    fn optional_text_fields_treat_empty_as_absent() {
        let raw = RawSubmission::new("A cubist jazz band at night")
            .with_artistic_movement("")
            .with_color_mood("  ")
            .with_style_reference("")
            .with_style_strength("");
        let request = GenerationRequest::validate(&raw).unwrap();
        assert_eq!(request.prompt(), "A cubist jazz band at night");
        assert!(request.artistic_movement().is_none());
        assert!(request.color_mood().is_none());
        assert!(!request.has_style_reference());
        assert_eq!(request.style_strength_applied(), 0.0);
    }

    #[test]
    fn strength_is_coerced_from_text() {
        let raw = RawSubmission::new("Storm over a neon harbor")
            .with_style_reference(PNG)
            .with_style_strength(" 62.5 ");
        let request = GenerationRequest::validate(&raw).unwrap();
        assert_eq!(request.style_strength(), Some(62.5));
        assert_eq!(request.style_reference().unwrap().mime_type(), "image/png");
    }

    #[test]
    fn strength_without_reference_is_dropped() {
        let raw = RawSubmission::new("Quiet tide pools").with_style_strength(80);
        let request = GenerationRequest::validate(&raw).unwrap();
        assert!(request.style_strength().is_none());
        assert_eq!(request.style_strength_applied(), 0.0);
    }

    #[test]
    fn reference_without_strength_applies_zero() {
        let raw = RawSubmission::new("Quiet tide pools").with_style_reference(PNG);
        let request = GenerationRequest::validate(&raw).unwrap();
        assert!(request.has_style_reference());
        assert_eq!(request.style_strength_applied(), 0.0);
    }

    #[test]
    fn bad_strength_and_reference_are_field_scoped() {
        let raw = RawSubmission::new("Fractured sunrise")
            .with_style_reference("data:text/plain;base64,aGVsbG8=")
            .with_style_strength("loud");
        let errors = GenerationRequest::validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["styleStrength"], vec!["Style strength must be a number.".to_string()]);
        assert!(errors.contains_key("styleReference"));

        for strength in ["-1", "100.5", "NaN", "inf"] {
            let raw = RawSubmission::new("Fractured sunrise").with_style_strength(strength);
            assert!(GenerationRequest::validate(&raw)
                .unwrap_err()
                .contains_key("styleStrength"));
        }
    }

    #[test]
    fn raw_submission_reads_camel_case_json() {
        let raw: RawSubmission = serde_json::from_value(serde_json::json!({
            "prompt": "Orbiting koi",
            "styleReference": PNG,
            "artisticMovement": "Surrealism",
            "colorMood": "Pastel",
            "styleStrength": "40"
        }))
        .unwrap();
        let request = GenerationRequest::validate(&raw).unwrap();
        assert_eq!(request.artistic_movement(), Some("Surrealism"));
        assert_eq!(request.color_mood(), Some("Pastel"));
        assert_eq!(request.style_strength_applied(), 40.0);
    }

    #[test]
    fn numeric_strength_in_json_is_accepted() {
        let raw: RawSubmission = serde_json::from_value(serde_json::json!({
            "prompt": "Orbiting koi",
            "styleReference": PNG,
            "styleStrength": 62.5
        }))
        .unwrap();
        assert_eq!(raw.style_strength.as_deref(), Some("62.5"));

        let raw: RawSubmission =
            serde_json::from_value(serde_json::json!({ "prompt": "Orbiting koi", "styleStrength": 75 }))
                .unwrap();
        assert_eq!(raw.style_strength.as_deref(), Some("75"));

        let raw: RawSubmission =
            serde_json::from_value(serde_json::json!({ "prompt": "Orbiting koi", "styleStrength": null }))
                .unwrap();
        assert!(raw.style_strength.is_none());

        let raw: RawSubmission =
            serde_json::from_value(serde_json::json!({ "prompt": "Orbiting koi" })).unwrap();
        assert!(raw.style_strength.is_none());
    }
}
