use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::external::ClassifierWorker;
use crate::models::{AnalysisOutcome, AnalysisResponse};
use crate::services::{classifier_service, portfolio_service, sanitizer};
use crate::store::PortfolioStore;

pub const TEXT_REQUIRED: &str = "Text input is required";
pub const INVALID_AFTER_SANITIZATION: &str = "Invalid input after sanitization";

/// Pulls `text` out of the request body. Missing, non-string and empty values are rejected.
pub fn extract_text(body: &Value) -> Result<&Value, AppError> {
    match body.get("text") {
        Some(text) if text.as_str().is_some_and(|s| !s.is_empty()) => Ok(text),
        _ => Err(AppError::InvalidInput(TEXT_REQUIRED.to_string())),
    }
}

/// Runs one request through sanitize → classify → resolve → assemble.
///
/// Classifier failures never surface here; only bad input and store faults do.
pub async fn analyze(
    worker: &dyn ClassifierWorker,
    store: &dyn PortfolioStore,
    body: &Value,
) -> Result<AnalysisResponse, AppError> {
    let text = extract_text(body)?;

    let sanitized = sanitizer::sanitize_value(text);
    if sanitized.is_empty() {
        warn!("Input was empty after sanitization");
        return Err(AppError::InvalidInput(INVALID_AFTER_SANITIZATION.to_string()));
    }
    debug!("Sanitized input to {} chars", sanitized.chars().count());

    let classification = classifier_service::classify(worker, &sanitized).await;
    let portfolio = portfolio_service::resolve(store, classification.risk_profile).await?;
    let response = AnalysisResponse::assemble(classification, portfolio);

    match response.outcome() {
        AnalysisOutcome::Degraded => warn!(
            "Analysis degraded to fallback: {}",
            response.error.as_deref().unwrap_or_default()
        ),
        outcome => info!(
            risk_profile = %response.risk_profile,
            has_portfolio = response.portfolio.is_some(),
            "Analysis completed ({:?})",
            outcome
        ),
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::WorkerError;
    use crate::models::{AssetAllocation, ClassificationResult, PortfolioDefinition, RiskProfile};
    use crate::services::classifier_service::PROCESS_FAILED;
    use crate::store::InMemoryPortfolioStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records what it was asked to classify.
    struct RecordingWorker {
        result: Result<ClassificationResult, String>,
        seen: Mutex<Vec<String>>,
    }

    impl RecordingWorker {
        fn answering(risk_profile: RiskProfile, confidence: f64) -> Self {
            Self {
                result: Ok(ClassificationResult {
                    risk_profile,
                    confidence,
                    warning: None,
                    error: None,
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err("exit status: 1".into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ClassifierWorker for RecordingWorker {
        async fn run(&self, text: &str) -> Result<ClassificationResult, WorkerError> {
            self.seen.lock().unwrap().push(text.to_string());
            self.result.clone().map_err(|status| WorkerError::ExitStatus {
                status,
                stderr: String::new(),
            })
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PortfolioStore for BrokenStore {
        async fn find_by_risk_profile(
            &self,
            _risk_profile: RiskProfile,
        ) -> Result<Option<PortfolioDefinition>, AppError> {
            Err(AppError::Db(sqlx::Error::PoolTimedOut))
        }

        async fn fetch_all(&self) -> Result<Vec<PortfolioDefinition>, AppError> {
            Err(AppError::Db(sqlx::Error::PoolTimedOut))
        }
    }

    #[test]
    fn test_extract_text_rejects_missing_empty_and_non_string() {
        for body in [json!({}), json!({"text": ""}), json!({"text": 7}), json!({"text": null}), json!("text")] {
            match extract_text(&body) {
                Err(AppError::InvalidInput(msg)) => assert_eq!(msg, TEXT_REQUIRED),
                other => panic!("expected invalid input for {}, got {:?}", body, other),
            }
        }
    }

    #[tokio::test]
    async fn test_analyze_passes_sanitized_text_to_worker() {
        let worker = RecordingWorker::answering(RiskProfile::Aggressive, 0.9);
        let store = InMemoryPortfolioStore::seeded().unwrap();
        let body = json!({"text": "  crypto moonshot; <script>x()</script>long horizon  "});

        let response = analyze(&worker, &store, &body).await.unwrap();

        assert_eq!(worker.seen.lock().unwrap().as_slice(), ["crypto moonshot long horizon"]);
        assert_eq!(response.risk_profile, RiskProfile::Aggressive);
        assert_eq!(
            response.portfolio.unwrap().asset_allocation,
            AssetAllocation::new(70, 10, 5, 15)
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_text_that_sanitizes_to_empty() {
        let worker = RecordingWorker::answering(RiskProfile::Aggressive, 0.9);
        let store = InMemoryPortfolioStore::seeded().unwrap();
        let body = json!({"text": "<script>alert(1)</script>"});

        match analyze(&worker, &store, &body).await {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, INVALID_AFTER_SANITIZATION),
            other => panic!("expected invalid input, got {:?}", other),
        }
        assert!(worker.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_worker_failure_still_returns_balanced_portfolio() {
        let worker = RecordingWorker::failing();
        let store = InMemoryPortfolioStore::seeded().unwrap();

        let response = analyze(&worker, &store, &json!({"text": "help"})).await.unwrap();

        assert_eq!(response.risk_profile, RiskProfile::Balanced);
        assert_eq!(response.confidence, 0.33);
        assert_eq!(response.error.as_deref(), Some(PROCESS_FAILED));
        assert_eq!(
            response.portfolio.unwrap().asset_allocation,
            AssetAllocation::new(50, 30, 15, 5)
        );
    }

    #[tokio::test]
    async fn test_missing_portfolio_is_null_not_error() {
        let worker = RecordingWorker::answering(RiskProfile::Conservative, 0.8);
        let store = InMemoryPortfolioStore::empty();

        let response = analyze(&worker, &store, &json!({"text": "retiring soon"})).await.unwrap();
        assert!(response.portfolio.is_none());
        assert_eq!(response.outcome(), AnalysisOutcome::Success);
    }

    #[tokio::test]
    async fn test_store_fault_is_internal_error() {
        let worker = RecordingWorker::answering(RiskProfile::Conservative, 0.8);
        let result = analyze(&worker, &BrokenStore, &json!({"text": "retiring soon"})).await;
        assert!(matches!(result, Err(AppError::Db(_))));
    }
}
