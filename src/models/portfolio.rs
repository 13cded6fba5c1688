use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::RiskProfile;

pub const DEFAULT_VISUALISATION_COLOR: &str = "#4CAF50";

/// Percentage split of a model portfolio across the four asset classes.
///
/// Each value is in [0, 100] and the four values sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub stocks: i32,
    pub bonds: i32,
    pub cash: i32,
    pub crypto: i32,
}

#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    #[error("{field} allocation {value} is outside 0-100")]
    OutOfRange { field: &'static str, value: i32 },
    #[error("allocations must sum to 100, got {0}")]
    BadTotal(i32),
}

impl AssetAllocation {
    pub fn new(stocks: i32, bonds: i32, cash: i32, crypto: i32) -> Self {
        Self { stocks, bonds, cash, crypto }
    }

    pub fn total(&self) -> i32 {
        self.stocks + self.bonds + self.cash + self.crypto
    }

    /// Checked when a definition is written; lookups trust stored rows.
    pub fn validate(&self) -> Result<(), AllocationError> {
        for (field, value) in [
            ("stocks", self.stocks),
            ("bonds", self.bonds),
            ("cash", self.cash),
            ("crypto", self.crypto),
        ] {
            if !(0..=100).contains(&value) {
                return Err(AllocationError::OutOfRange { field, value });
            }
        }
        match self.total() {
            100 => Ok(()),
            total => Err(AllocationError::BadTotal(total)),
        }
    }
}

// A model portfolio template attached to exactly one risk profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDefinition {
    pub risk_profile: RiskProfile,
    pub description: String,
    pub asset_allocation: AssetAllocation,
    pub visualisation_color: String,
    pub last_updated: DateTime<Utc>,
}

/// Public projection of a definition embedded in analysis responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioView {
    pub description: String,
    pub asset_allocation: AssetAllocation,
    pub visualisation_color: String,
}

impl PortfolioDefinition {
    pub fn new(
        risk_profile: RiskProfile,
        description: impl Into<String>,
        asset_allocation: AssetAllocation,
        visualisation_color: impl Into<String>,
    ) -> Self {
        Self {
            risk_profile,
            description: description.into(),
            asset_allocation,
            visualisation_color: visualisation_color.into(),
            last_updated: Utc::now(),
        }
    }

    pub fn view(&self) -> PortfolioView {
        PortfolioView {
            description: self.description.clone(),
            asset_allocation: self.asset_allocation,
            visualisation_color: self.visualisation_color.clone(),
        }
    }

    /// The three model portfolios shipped with the service.
    pub fn defaults() -> Vec<PortfolioDefinition> {
        vec![
            PortfolioDefinition::new(
                RiskProfile::Conservative,
                "Designed for capital preservation with minimal volatility. Ideal for near-term goals (1-3 years) or risk-averse investors approaching retirement.",
                AssetAllocation::new(20, 50, 25, 5),
                "#4CAF50",
            ),
            PortfolioDefinition::new(
                RiskProfile::Balanced,
                "A diversified mix targeting moderate growth with manageable risk. Suitable for medium-term goals (5-10 years) like university fees or home deposits.",
                AssetAllocation::new(50, 30, 15, 5),
                "#2196F3",
            ),
            PortfolioDefinition::new(
                RiskProfile::Aggressive,
                "Designed for maximum growth over a long time horizon (10+ years). High volatility expected but potential for significant returns.",
                AssetAllocation::new(70, 10, 5, 15),
                "#FF5733",
            ),
        ]
    }
}
