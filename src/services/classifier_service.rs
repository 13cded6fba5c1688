use tracing::{info, warn};

use crate::external::{ClassifierWorker, WorkerError};
use crate::models::ClassificationResult;

pub const PROCESS_FAILED: &str = "Classification process failed";
pub const PARSE_FAILED: &str = "Failed to parse classification result";
pub const START_FAILED: &str = "Failed to start classification process";

/// Client-facing reason for a worker failure. Timeouts count as a failed process.
pub fn fallback_reason(error: &WorkerError) -> &'static str {
    match error {
        WorkerError::Spawn(_) => START_FAILED,
        WorkerError::Parse(_) => PARSE_FAILED,
        WorkerError::ExitStatus { .. } | WorkerError::Io(_) | WorkerError::Timeout(_) => {
            PROCESS_FAILED
        }
    }
}

/// Classifies sanitized text. Never fails: every worker failure becomes the
/// Balanced fallback with a descriptive `error`.
pub async fn classify(worker: &dyn ClassifierWorker, text: &str) -> ClassificationResult {
    match worker.run(text).await {
        Ok(result) if result.has_valid_confidence() => {
            info!(
                risk_profile = %result.risk_profile,
                confidence = result.confidence,
                "Classification succeeded"
            );
            result
        }
        Ok(result) => {
            warn!("Classifier returned confidence {} outside [0, 1]", result.confidence);
            ClassificationResult::fallback(PARSE_FAILED)
        }
        Err(e) => {
            warn!("Classifier worker failed, using fallback: {}", e);
            ClassificationResult::fallback(fallback_reason(&e))
        }
    }
}
