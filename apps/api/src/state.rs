use std::sync::Arc;

use sqlx::PgPool;

use crate::agents::retry::RetryPolicy;
use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The completion client behind a trait object so tests can script it.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
    /// Retry policy applied to every agent step.
    pub retry: RetryPolicy,
}
