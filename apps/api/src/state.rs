use std::sync::Arc;

use crate::interview::ai::AiService;
use crate::interview::flow::InterviewService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The model-provider seam. Production wires `GeminiAiService`; tests swap
    /// in a stub.
    pub ai: Arc<dyn AiService>,
    /// The single interview session and its archive.
    pub interview: Arc<InterviewService>,
}
