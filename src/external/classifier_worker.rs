use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ClassificationResult;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start worker: {0}")]
    Spawn(String),

    #[error("worker exited with {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },

    #[error("worker i/o error: {0}")]
    Io(String),

    #[error("unparseable worker output: {0}")]
    Parse(String),

    #[error("worker timed out after {0:?}")]
    Timeout(Duration),
}

/// An out-of-process text classifier.
///
/// One call per request; implementations must not share mutable state between calls.
#[async_trait]
pub trait ClassifierWorker: Send + Sync {
    async fn run(&self, text: &str) -> Result<ClassificationResult, WorkerError>;
}

/// Decodes the worker's stdout: exactly one JSON object, nothing else.
pub fn parse_output(stdout: &[u8]) -> Result<ClassificationResult, WorkerError> {
    let text = String::from_utf8_lossy(stdout);
    let result: ClassificationResult = serde_json::from_str(text.trim())
        .map_err(|e| WorkerError::Parse(e.to_string()))?;

    if !result.has_valid_confidence() {
        return Err(WorkerError::Parse(format!(
            "confidence {} is outside [0, 1]",
            result.confidence
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskProfile;

    #[test]
    fn test_parse_valid_output() {
        let result = parse_output(b"{\"risk_profile\":\"Aggressive\",\"confidence\":0.87}\n").unwrap();
        assert_eq!(result.risk_profile, RiskProfile::Aggressive);
        assert_eq!(result.confidence, 0.87);
    }

    #[test]
    fn test_parse_keeps_worker_error_and_warning() {
        let result = parse_output(
            br#"{"risk_profile":"Balanced","confidence":0.33,"error":"Models not found. Please run train_model.py first."}"#,
        )
        .unwrap();
        assert_eq!(result.error.as_deref(), Some("Models not found. Please run train_model.py first."));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(parse_output(b"Traceback (most recent call last)"), Err(WorkerError::Parse(_))));
        assert!(matches!(parse_output(b""), Err(WorkerError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_profile() {
        let out = br#"{"risk_profile":"Reckless","confidence":0.5}"#;
        assert!(matches!(parse_output(out), Err(WorkerError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_confidence_out_of_range() {
        let out = br#"{"risk_profile":"Aggressive","confidence":1.7}"#;
        assert!(matches!(parse_output(out), Err(WorkerError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_trailing_output() {
        let out = b"{\"risk_profile\":\"Aggressive\",\"confidence\":0.5}\n{\"extra\":1}";
        assert!(matches!(parse_output(out), Err(WorkerError::Parse(_))));
    }
}
