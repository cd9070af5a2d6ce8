use std::path::PathBuf;
use std::sync::Arc;

use estimate::{BusinessRulesEngine, BusinessStandards, MenuCatalog};
use experts::EstimateExpert;
use storage::EstimateRepository;

use crate::config::ServerConfig;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub menu: Arc<MenuCatalog>,
    pub engine: Arc<BusinessRulesEngine>,
    pub repo: EstimateRepository,
    pub quotes_dir: PathBuf,
    pub config: ServerConfig,
    /// Serves `/api/experts`; those routes answer 503 without it.
    pub expert: Option<Arc<EstimateExpert>>,
}

impl AppState {
    pub fn new(
        menu: Arc<MenuCatalog>,
        standards: BusinessStandards,
        repo: EstimateRepository,
        quotes_dir: impl Into<PathBuf>,
        config: ServerConfig,
    ) -> Self {
        Self {
            menu,
            engine: Arc::new(BusinessRulesEngine::new(standards)),
            repo,
            quotes_dir: quotes_dir.into(),
            config,
            expert: None,
        }
    }

    pub fn with_expert(mut self, expert: Arc<EstimateExpert>) -> Self {
        self.expert = Some(expert);
        self
    }

    pub fn standards(&self) -> &BusinessStandards {
        self.engine.standards()
    }
}
