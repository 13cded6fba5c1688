use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use crate::models::{ErrorBody, PortfolioDefinition};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fetch_portfolios))
}

/// GET /portfolios
/// Lists every model portfolio (admin/debug view).
pub async fn fetch_portfolios(
    State(state): State<AppState>,
) -> Result<Json<Vec<PortfolioDefinition>>, (StatusCode, Json<ErrorBody>)> {
    info!("GET /portfolios - Fetching all portfolios");
    let portfolios = services::portfolio_service::fetch_all(state.store.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolios: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Failed to fetch portfolios")),
            )
        })?;
    Ok(Json(portfolios))
}
