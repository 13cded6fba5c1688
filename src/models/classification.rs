use serde::{Deserialize, Serialize};

use crate::models::RiskProfile;

pub const FALLBACK_CONFIDENCE: f64 = 0.33;

/// Outcome of classifying one piece of text.
///
/// Also the exact stdout contract of the classifier worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub risk_profile: RiskProfile,
    pub confidence: f64,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ClassificationResult {
    /// Safe default used whenever the worker's answer can't be trusted.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            risk_profile: RiskProfile::default(),
            confidence: FALLBACK_CONFIDENCE,
            warning: None,
            error: Some(reason.into()),
        }
    }

    pub fn has_valid_confidence(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}
