use crate::{
    analysis::{AnalysisInput, Analyzer},
    capability::{ImageCapability, TextCapability},
    dispatch::Dispatcher,
    error::{ArtError, Result},
    gemini::GeminiClient,
    logger,
    models::{ActionResponse, GenerationOutcome, GenerationRequest, RawSubmission},
};
use std::{fmt, sync::Arc};
use uuid::Uuid;

/// Where a request is in its single pass through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Dispatching,
    Analyzing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Dispatching => "dispatching",
            Stage::Analyzing => "analyzing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs validate, generate, analyze in that order and folds the result into one outcome.
///
/// Analysis only starts once an image exists, and an analysis failure drops
/// that image: callers see either a complete outcome or an error.
#[derive(Clone)]
pub struct Orchestrator {
    dispatcher: Dispatcher,
    analyzer: Analyzer,
}

impl Orchestrator {
    pub fn new(image: Arc<dyn ImageCapability>, text: Arc<dyn TextCapability>) -> Self {
        Self {
            dispatcher: Dispatcher::new(image),
            analyzer: Analyzer::new(text),
        }
    }

    pub fn from_client(client: &GeminiClient) -> Self {
        Self::new(
            Arc::new(client.image().clone()),
            Arc::new(client.text().clone()),
        )
    }

    /// Entry point for form submissions; never fails, errors come back in the response.
    pub async fn generate_art(&self, raw: &RawSubmission) -> ActionResponse {
        self.run(raw).await.into()
    }

    pub async fn run(&self, raw: &RawSubmission) -> Result<GenerationOutcome> {
        let request_id = Uuid::new_v4();
        enter(request_id, Stage::Validating);

        let request = match GenerationRequest::validate(raw) {
            Ok(request) => request,
            Err(errors) => {
                log::warn!("[req:{}] Submission rejected: {:?}", request_id, errors);
                enter(request_id, Stage::Done);
                return Err(ArtError::Validation(errors));
            }
        };

        let result = self.execute_with_id(request_id, &request).await;
        enter(request_id, Stage::Done);
        result
    }

    /// Runs an already validated request.
    pub async fn execute(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        self.execute_with_id(Uuid::new_v4(), request).await
    }

    async fn execute_with_id(
        &self,
        request_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome> {
        enter(request_id, Stage::Dispatching);
        let art = {
            let _timer = logger::timer("image generation");
            self.dispatcher.dispatch(request).await?
        };

        enter(request_id, Stage::Analyzing);
        let analysis = {
            let _timer = logger::timer("art analysis");
            match self.analyzer.analyze(&AnalysisInput::from_request(request)).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    log::error!(
                        "[req:{}] Analysis failed, discarding generated image: {}",
                        request_id,
                        e
                    );
                    return Err(e);
                }
            }
        };

        log::info!("[req:{}] ✅ Art and analysis ready", request_id);
        Ok(GenerationOutcome {
            art_data_uri: art.art_data_uri,
            analysis,
            style_strength_applied: request.style_strength_applied(),
        })
    }
}

fn enter(request_id: Uuid, stage: Stage) {
    log::debug!("[req:{}] -> {}", request_id, stage);
}
