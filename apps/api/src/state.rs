use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::store::CareerStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-user data; the session subject travels with each request.
#[derive(Clone)]
pub struct AppState {
    /// Backend facade. `PgStore` in production.
    pub store: Arc<dyn CareerStore>,
    pub llm: GeminiClient,
    pub config: Config,
}
