mod memory;
mod portfolios;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{PortfolioDefinition, RiskProfile};

pub use memory::InMemoryPortfolioStore;
pub use portfolios::PgPortfolioStore;

/// Read-only source of model portfolio definitions.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn find_by_risk_profile(
        &self,
        risk_profile: RiskProfile,
    ) -> Result<Option<PortfolioDefinition>, AppError>;

    async fn fetch_all(&self) -> Result<Vec<PortfolioDefinition>, AppError>;
}
