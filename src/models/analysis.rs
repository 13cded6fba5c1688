use serde::{Deserialize, Serialize};

use crate::models::{ClassificationResult, PortfolioDefinition, PortfolioView, RiskProfile};

/// Body of a successful `POST /analyze`.
///
/// `portfolio`, `warning` and `error` are always serialized, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub risk_profile: RiskProfile,
    pub confidence: f64,
    pub portfolio: Option<PortfolioView>,
    pub warning: Option<String>,
    pub error: Option<String>,
}

/// Which of the 200-response shapes a response has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Worker answered cleanly.
    Success,
    /// Worker answered but flagged the input (e.g. too short).
    Advisory,
    /// Worker failed; the fallback classification was used.
    Degraded,
}

impl AnalysisResponse {
    pub fn assemble(
        classification: ClassificationResult,
        portfolio: Option<PortfolioDefinition>,
    ) -> Self {
        Self {
            risk_profile: classification.risk_profile,
            confidence: classification.confidence,
            portfolio: portfolio.as_ref().map(PortfolioDefinition::view),
            warning: classification.warning,
            error: classification.error,
        }
    }

    pub fn outcome(&self) -> AnalysisOutcome {
        match (&self.error, &self.warning) {
            (Some(_), _) => AnalysisOutcome::Degraded,
            (None, Some(_)) => AnalysisOutcome::Advisory,
            (None, None) => AnalysisOutcome::Success,
        }
    }
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
