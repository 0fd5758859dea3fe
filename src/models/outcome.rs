use super::data_uri::DataUri;
use crate::error::{ArtError, FieldErrors, Result};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtAnalysis {
    pub textual_analysis: String,
}

/// Image and critique from one successful request. Never built partially.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub art_data_uri: String,
    pub analysis: ArtAnalysis,
    pub style_strength_applied: f64,
}

impl GenerationOutcome {
    pub fn art(&self) -> Result<DataUri> {
        DataUri::parse(&self.art_data_uri)
    }

    pub fn composition(&self) -> StyleComposition {
        StyleComposition::from_strength(self.style_strength_applied)
    }
}

/// Split between the prompt's and the reference image's influence, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleComposition {
    pub prompt_influence: f64,
    pub style_influence: f64,
}

impl StyleComposition {
    pub fn from_strength(strength: f64) -> Self {
        let style = strength.clamp(0.0, 100.0);
        Self {
            prompt_influence: 100.0 - style,
            style_influence: style,
        }
    }

    pub fn has_style(&self) -> bool {
        self.style_influence > 0.0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    success: bool,
    pub art_data_uri: String,
    pub analysis: ArtAnalysis,
    #[serde(serialize_with = "serialize_number")]
    pub style_strength: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureResponse {
    success: bool,
    pub error: FieldErrors,
}

/// The JSON contract handed back to the form.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Success(SuccessResponse),
    Failure(FailureResponse),
}

impl ActionResponse {
    pub fn success(outcome: GenerationOutcome) -> Self {
        ActionResponse::Success(SuccessResponse {
            success: true,
            art_data_uri: outcome.art_data_uri,
            analysis: outcome.analysis,
            style_strength: outcome.style_strength_applied,
        })
    }

    pub fn failure(error: &ArtError) -> Self {
        ActionResponse::Failure(FailureResponse {
            success: false,
            error: error.field_errors(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResponse::Success(_))
    }
}

impl From<Result<GenerationOutcome>> for ActionResponse {
    fn from(result: Result<GenerationOutcome>) -> Self {
        match result {
            Ok(outcome) => ActionResponse::success(outcome),
            Err(e) => ActionResponse::failure(&e),
        }
    }
}

// Whole strengths go out as integers, the way the form submitted them.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
