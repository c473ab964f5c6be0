use std::sync::Arc;

use crate::config::Config;
use crate::interview::Interviewer;
use crate::llm_client::LlmGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub interviewer: Arc<Interviewer>,
    /// Gateway for the stand-alone assessment endpoints. Shares its backend
    /// with the interviewer's gateway.
    pub llm: LlmGateway,
    pub config: Config,
}
