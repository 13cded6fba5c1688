use std::sync::Arc;

use crate::config::AppConfig;
use crate::external::ClassifierWorker;
use crate::store::PortfolioStore;

/// Shared, read-only handles. Nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn PortfolioStore>,
    pub classifier: Arc<dyn ClassifierWorker>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn PortfolioStore>,
        classifier: Arc<dyn ClassifierWorker>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            classifier,
        }
    }
}
