//! Application state.

use std::sync::Arc;

use campaign_core::Session;
use campaign_pipeline::AnalysisPipeline;
use tokio::sync::Mutex;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
    /// The single user session. Held for the whole pipeline run.
    pub session: Arc<Mutex<Session>>,
    /// Model preselected in the form.
    pub default_model: Arc<str>,
}

impl AppState {
    pub fn new(pipeline: AnalysisPipeline, default_model: &str) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            session: Arc::new(Mutex::new(Session::new())),
            default_model: Arc::from(default_model),
        }
    }
}
