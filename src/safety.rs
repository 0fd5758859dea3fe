//! Content-safety thresholds sent with style-guided generations.
//!
//! Unconditioned generations run with the model's defaults; only requests that
//! carry a user-supplied reference image get this table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
}

/// Ordered from most permissive to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockThreshold {
    #[serde(rename = "BLOCK_NONE")]
    BlockNone,
    #[serde(rename = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh,
    #[serde(rename = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove,
    #[serde(rename = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

pub const STYLE_GUIDED_SAFETY_POLICY: [SafetySetting; 4] = [
    SafetySetting {
        category: HarmCategory::HateSpeech,
        threshold: BlockThreshold::BlockOnlyHigh,
    },
    SafetySetting {
        category: HarmCategory::DangerousContent,
        threshold: BlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::Harassment,
        threshold: BlockThreshold::BlockMediumAndAbove,
    },
    SafetySetting {
        category: HarmCategory::SexuallyExplicit,
        threshold: BlockThreshold::BlockLowAndAbove,
    },
];

pub fn style_guided_policy() -> Vec<SafetySetting> {
    STYLE_GUIDED_SAFETY_POLICY.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn policy_covers_each_category_once() {
        let policy = style_guided_policy();
        assert_eq!(policy.len(), 4);
        for category in [
            HarmCategory::HateSpeech,
            HarmCategory::DangerousContent,
            HarmCategory::Harassment,
            HarmCategory::SexuallyExplicit,
        ] {
            assert_eq!(policy.iter().filter(|s| s.category == category).count(), 1);
        }
    }

    #[test]
    fn thresholds_order_by_strictness() {
        assert!(BlockThreshold::BlockNone < BlockThreshold::BlockOnlyHigh);
        assert!(BlockThreshold::BlockOnlyHigh < BlockThreshold::BlockMediumAndAbove);
        assert!(BlockThreshold::BlockMediumAndAbove < BlockThreshold::BlockLowAndAbove);
    }

    #[test]
    fn serializes_to_gemini_names() {
        let value = serde_json::to_value(style_guided_policy()).unwrap();
        assert_eq!(
            value,
            json!([
                { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_ONLY_HIGH" },
                { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE" },
                { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_LOW_AND_ABOVE" }
            ])
        );
    }
}
