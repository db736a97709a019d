use std::sync::Arc;

use crate::config::Config;
use crate::scoring::scorer::{ResumeScorer, WeightedScorer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable resume scorer. Default: WeightedScorer with the configured caps.
    pub scorer: Arc<dyn ResumeScorer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let scorer = Arc::new(WeightedScorer::new(config.score_caps));
        Self { config, scorer }
    }
}
