use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::portfolio_queries;
use crate::errors::AppError;
use crate::models::{PortfolioDefinition, RiskProfile};
use crate::store::PortfolioStore;

/// Postgres-backed store over the `portfolio_definitions` table.
#[derive(Clone)]
pub struct PgPortfolioStore {
    pool: PgPool,
}

impl PgPortfolioStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for PgPortfolioStore {
    async fn find_by_risk_profile(
        &self,
        risk_profile: RiskProfile,
    ) -> Result<Option<PortfolioDefinition>, AppError> {
        let definition = portfolio_queries::fetch_by_risk_profile(&self.pool, risk_profile).await?;
        Ok(definition)
    }

    async fn fetch_all(&self) -> Result<Vec<PortfolioDefinition>, AppError> {
        let definitions = portfolio_queries::fetch_all(&self.pool).await?;
        Ok(definitions)
    }
}
