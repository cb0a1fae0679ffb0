use std::sync::Arc;

use crate::config::Config;
use crate::scoring::invoker::ScoringInvoker;
use crate::scoring::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Production uses `PgResumeStore`; tests swap in an in-memory store.
    pub store: Arc<dyn ResumeStore>,
    /// Wraps the model boundary. Production uses `LlmClient`; tests swap in a stub.
    pub invoker: Arc<ScoringInvoker>,
    pub config: Config,
}
