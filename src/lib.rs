pub mod analysis;
pub mod capability;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gemini;
pub mod history;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod safety;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::{AnalysisInput, Analyzer};
pub use capability::{ImageCapability, TextCapability};
pub use config::{Config, GeminiConfig};
pub use dispatch::{Dispatcher, GenerationStrategy};
pub use error::{ArtError, FieldErrors, Result, SERVER_ERROR_KEY};
pub use gemini::{GeminiClient, ImageClient, TextClient};
pub use history::SessionHistory;
pub use models::{
    ActionResponse, ArtAnalysis, DataUri, GenerationOutcome, GenerationRequest, RawSubmission,
    StyleComposition, StyleGuide,
};
pub use orchestrator::{Orchestrator, Stage};
