use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use risk_profiler_backend::app;
use risk_profiler_backend::config::AppConfig;
use risk_profiler_backend::external::{ClassifierWorker, ProcessClassifierWorker};
use risk_profiler_backend::logging::{init_logging, LoggingConfig};
use risk_profiler_backend::state::AppState;
use risk_profiler_backend::store::{InMemoryPortfolioStore, PgPortfolioStore, PortfolioStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn PortfolioStore> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PgPortfolioStore::new(pool);
            store.migrate().await.context("failed to run migrations")?;
            tracing::info!("✓ Connected to Postgres portfolio store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving built-in model portfolios from memory");
            Arc::new(InMemoryPortfolioStore::seeded()?)
        }
    };

    let worker = ProcessClassifierWorker::from_config(&config.classifier);
    tracing::info!(
        program = %config.classifier.program,
        script = ?config.classifier.script,
        "🧠 Classifier worker timeout {:?}",
        worker.timeout()
    );
    let classifier: Arc<dyn ClassifierWorker> = Arc::new(worker);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, store, classifier);
    let app = app::create_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Risk profiler backend running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
