use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::AnalysisResponse;
use crate::services::analysis_service::{self, TEXT_REQUIRED};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(analyze))
}

/// POST /analyze
/// Classifies the submitted text and attaches the matching model portfolio.
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    info!("POST /analyze - Analyzing risk profile");

    let Json(body) = body.map_err(|e| {
        warn!("Rejected request body: {}", e);
        AppError::InvalidInput(TEXT_REQUIRED.to_string())
    })?;

    let response = analysis_service::analyze(
        state.classifier.as_ref(),
        state.store.as_ref(),
        &body,
    )
    .await?;
    Ok(Json(response))
}
