use std::collections::BTreeMap;
use thiserror::Error;

/// Reserved error key for failures that are not tied to a submitted field.
pub const SERVER_ERROR_KEY: &str = "_server";

/// Field name -> messages. Ordered so responses serialize deterministically.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum ArtError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Gemini API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Invalid submission: {}", summarize(.0))]
    Validation(FieldErrors),
    #[error("{0}")]
    GenerationFailure(String),
    #[error("{0}")]
    AnalysisFailure(String),
}

impl ArtError {
    /// Field-keyed view of the error as the caller renders it.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ArtError::Validation(errors) => errors.clone(),
            other => {
                let mut errors = FieldErrors::new();
                errors.insert(SERVER_ERROR_KEY.to_string(), vec![other.to_string()]);
                errors
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ArtError::Validation(_))
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ArtError>;
