use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::{PortfolioDefinition, RiskProfile};
use crate::store::PortfolioStore;

/// Looks up the model portfolio for a profile. A missing row is `Ok(None)`.
pub async fn resolve(
    store: &dyn PortfolioStore,
    risk_profile: RiskProfile,
) -> Result<Option<PortfolioDefinition>, AppError> {
    let portfolio = store.find_by_risk_profile(risk_profile).await?;
    match &portfolio {
        Some(_) => debug!("Resolved portfolio for {}", risk_profile),
        None => warn!("No portfolio definition stored for {}", risk_profile),
    }
    Ok(portfolio)
}

pub async fn fetch_all(store: &dyn PortfolioStore) -> Result<Vec<PortfolioDefinition>, AppError> {
    store.fetch_all().await
}

/// Write-time checks: valid allocations and at most one definition per profile.
pub fn validate_for_write(definitions: &[PortfolioDefinition]) -> Result<(), AppError> {
    for (i, definition) in definitions.iter().enumerate() {
        if definition.description.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "{} portfolio description cannot be empty",
                definition.risk_profile
            )));
        }
        definition.asset_allocation.validate().map_err(|e| {
            AppError::InvalidInput(format!("{} portfolio: {}", definition.risk_profile, e))
        })?;
        if definitions[..i].iter().any(|d| d.risk_profile == definition.risk_profile) {
            return Err(AppError::InvalidInput(format!(
                "duplicate portfolio for {}",
                definition.risk_profile
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetAllocation;
    use crate::store::InMemoryPortfolioStore;

    #[tokio::test]
    async fn test_resolve_aggressive_returns_stored_allocation() {
        let store = InMemoryPortfolioStore::seeded().unwrap();
        let portfolio = resolve(&store, RiskProfile::Aggressive).await.unwrap().unwrap();
        assert_eq!(portfolio.asset_allocation, AssetAllocation::new(70, 10, 5, 15));
    }

    #[tokio::test]
    async fn test_resolve_missing_is_none() {
        let store = InMemoryPortfolioStore::empty();
        assert!(resolve(&store, RiskProfile::Conservative).await.unwrap().is_none());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(validate_for_write(&PortfolioDefinition::defaults()).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut definitions = PortfolioDefinition::defaults();
        definitions.push(definitions[0].clone());
        assert!(matches!(validate_for_write(&definitions), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_bad_allocation() {
        let definitions = vec![PortfolioDefinition::new(
            RiskProfile::Conservative,
            "safe",
            AssetAllocation::new(20, 50, 25, 6),
            "#4CAF50",
        )];
        assert!(matches!(validate_for_write(&definitions), Err(AppError::InvalidInput(_))));
    }
}
