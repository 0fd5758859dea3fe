use crate::{
    capability::TextCapability,
    error::{ArtError, Result},
    models::{ArtAnalysis, GenerationRequest, TextGenerationRequest},
};
use serde_json::json;
use std::sync::Arc;

/// Everything the critic is told about how the piece was made.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub prompt: String,
    pub style_reference_used: bool,
    pub artistic_movement: Option<String>,
    pub color_mood: Option<String>,
    pub style_strength: Option<f64>,
}

impl AnalysisInput {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            prompt: request.prompt().to_string(),
            style_reference_used: request.has_style_reference(),
            artistic_movement: request.artistic_movement().map(String::from),
            color_mood: request.color_mood().map(String::from),
            style_strength: request.style_strength(),
        }
    }
}

pub fn render_analysis_prompt(input: &AnalysisInput) -> String {
    let reference = if input.style_reference_used {
        match input.style_strength {
            Some(strength) => format!("Yes (with a strength of {}%)", strength),
            None => "Yes".to_string(),
        }
    } else {
        "No".to_string()
    };

    format!(
        "You are an insightful and concise art critic. You are analyzing a piece of AI-generated abstract art.
Your analysis should explain how the final piece reflects the inputs that were used to create it.

Creation Inputs:
- Main Concept/Prompt: \"{prompt}\"
- Style Reference Image Used: {reference}
- Specified Artistic Movement: {movement}
- Specified Color Mood: {mood}

Based on these inputs, provide a brief, 2-3 sentence analysis of the resulting artwork. Be creative and insightful.",
        prompt = input.prompt,
        reference = reference,
        movement = specified(input.artistic_movement.as_deref()),
        mood = specified(input.color_mood.as_deref()),
    )
}

fn specified(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "Not specified",
    }
}

pub fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "textualAnalysis": {
                "type": "STRING",
                "description": "A brief, insightful analysis of the artwork (2-3 sentences)."
            }
        },
        "required": ["textualAnalysis"]
    })
}

/// Produces the short critique that accompanies a generated image.
#[derive(Clone)]
pub struct Analyzer {
    capability: Arc<dyn TextCapability>,
}

impl Analyzer {
    pub fn new(capability: Arc<dyn TextCapability>) -> Self {
        Self { capability }
    }

    pub async fn analyze(&self, input: &AnalysisInput) -> Result<ArtAnalysis> {
        let request = TextGenerationRequest {
            prompt: render_analysis_prompt(input),
            output_schema: analysis_schema(),
        };

        let response = self
            .capability
            .generate_text(request)
            .await
            .map_err(|e| ArtError::AnalysisFailure(e.to_string()))?;

        let output = response
            .output
            .ok_or_else(|| ArtError::AnalysisFailure("Art analysis returned no output.".into()))?;

        let analysis: ArtAnalysis = serde_json::from_value(output).map_err(|e| {
            ArtError::AnalysisFailure(format!("Art analysis output was malformed: {}", e))
        })?;

        if analysis.textual_analysis.trim().is_empty() {
            return Err(ArtError::AnalysisFailure(
                "Art analysis returned an empty critique.".into(),
            ));
        }

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextGenerationResponse;
    use crate::test_support::RecordingTextCapability;

    fn input() -> AnalysisInput {
        AnalysisInput {
            prompt: "A cubist jazz band at night".into(),
            style_reference_used: false,
            artistic_movement: None,
            color_mood: None,
            style_strength: None,
        }
    }

    #[test]
    fn template_marks_absent_inputs() {
        let text = render_analysis_prompt(&input());
        assert!(text.contains("- Main Concept/Prompt: \"A cubist jazz band at night\""));
        assert!(text.contains("- Style Reference Image Used: No"));
        assert!(text.contains("- Specified Artistic Movement: Not specified"));
        assert!(text.contains("- Specified Color Mood: Not specified"));
    }

    #[test]
    fn template_renders_supplied_inputs() {
        let text = render_analysis_prompt(&AnalysisInput {
            style_reference_used: true,
            artistic_movement: Some("Cubism".into()),
            color_mood: Some("Vibrant".into()),
            style_strength: Some(75.0),
            ..input()
        });
        assert!(text.contains("- Style Reference Image Used: Yes (with a strength of 75%)"));
        assert!(text.contains("- Specified Artistic Movement: Cubism"));
        assert!(text.contains("- Specified Color Mood: Vibrant"));
    }

    #[test]
    fn strength_is_ignored_without_reference() {
        let text = render_analysis_prompt(&AnalysisInput {
            style_strength: Some(40.0),
            ..input()
        });
        assert!(!text.contains("40%"));
    }

    #[tokio::test]
    async fn analysis_reads_structured_output() {
        let capability = Arc::new(RecordingTextCapability::returning_analysis("Brassy angles swing."));
        let analyzer = Analyzer::new(capability.clone());

        let analysis = analyzer.analyze(&input()).await.unwrap();
        assert_eq!(analysis.textual_analysis, "Brassy angles swing.");

        let calls = capability.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].output_schema, analysis_schema());
    }

    #[tokio::test]
    async fn missing_or_malformed_output_fails() {
        for response in [
            TextGenerationResponse { output: None },
            TextGenerationResponse {
                output: Some(json!({ "critique": "wrong key" })),
            },
            TextGenerationResponse {
                output: Some(json!({ "textualAnalysis": "  " })),
            },
        ] {
            let analyzer = Analyzer::new(Arc::new(RecordingTextCapability::responding(Ok(response))));
            let err = analyzer.analyze(&input()).await.unwrap_err();
            assert!(matches!(err, ArtError::AnalysisFailure(_)));
        }
    }
}
