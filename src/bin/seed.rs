//! Replaces the stored model portfolios with the built-in definitions.
//!
//! Run: `cargo run --bin seed` with `DATABASE_URL` set.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use risk_profiler_backend::db::portfolio_queries;
use risk_profiler_backend::logging::{init_logging, LoggingConfig};
use risk_profiler_backend::models::PortfolioDefinition;
use risk_profiler_backend::services::portfolio_service;
use risk_profiler_backend::store::PgPortfolioStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let definitions = PortfolioDefinition::defaults();
    portfolio_service::validate_for_write(&definitions)?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    PgPortfolioStore::new(pool.clone()).migrate().await?;

    let inserted = portfolio_queries::replace_all(&pool, &definitions).await?;
    tracing::info!("✓ Inserted {} model portfolios", inserted);
    for d in &definitions {
        let a = d.asset_allocation;
        tracing::info!(
            "  - {}: {}% stocks, {}% bonds, {}% cash, {}% crypto",
            d.risk_profile, a.stocks, a.bonds, a.cash, a.crypto
        );
    }

    pool.close().await;
    Ok(())
}
