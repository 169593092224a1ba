use std::sync::Arc;

use crate::ats::catalogue::RoleCatalogue;
use crate::ats::scorer::{AtsScorer, KeywordAtsScorer};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalogue: Arc<RoleCatalogue>,
    /// Pluggable scorer. Default: KeywordAtsScorer over `catalogue`.
    pub scorer: Arc<dyn AtsScorer>,
}

impl AppState {
    pub fn new(config: Config, catalogue: RoleCatalogue) -> Self {
        let catalogue = Arc::new(catalogue);
        let scorer = Arc::new(KeywordAtsScorer::new(Arc::clone(&catalogue)));
        Self {
            config,
            catalogue,
            scorer,
        }
    }
}
