mod analysis;
mod classification;
mod portfolio;
mod risk_profile;

pub use analysis::{AnalysisOutcome, AnalysisResponse, ErrorBody};
pub use classification::{ClassificationResult, FALLBACK_CONFIDENCE};
pub use portfolio::{
    AllocationError, AssetAllocation, PortfolioDefinition, PortfolioView,
    DEFAULT_VISUALISATION_COLOR,
};
pub use risk_profile::RiskProfile;
