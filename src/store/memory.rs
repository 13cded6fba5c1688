use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{PortfolioDefinition, RiskProfile};
use crate::services::portfolio_service;
use crate::store::PortfolioStore;

/// Immutable in-process store. Used when no database is configured, and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortfolioStore {
    definitions: Vec<PortfolioDefinition>,
}

impl InMemoryPortfolioStore {
    /// Definitions go through the same write-time checks as the seed binary:
    /// valid allocations and at most one definition per profile.
    pub fn new(mut definitions: Vec<PortfolioDefinition>) -> Result<Self, AppError> {
        portfolio_service::validate_for_write(&definitions)?;
        definitions.sort_by_key(|d| RiskProfile::ALL.iter().position(|p| *p == d.risk_profile));
        Ok(Self { definitions })
    }

    pub fn seeded() -> Result<Self, AppError> {
        Self::new(PortfolioDefinition::defaults())
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioStore for InMemoryPortfolioStore {
    async fn find_by_risk_profile(
        &self,
        risk_profile: RiskProfile,
    ) -> Result<Option<PortfolioDefinition>, AppError> {
        Ok(self
            .definitions
            .iter()
            .find(|d| d.risk_profile == risk_profile)
            .cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<PortfolioDefinition>, AppError> {
        Ok(self.definitions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetAllocation;

    #[tokio::test]
    async fn test_seeded_store_finds_every_profile() {
        let store = InMemoryPortfolioStore::seeded().unwrap();
        for profile in RiskProfile::ALL {
            let found = store.find_by_risk_profile(profile).await.unwrap();
            assert_eq!(found.unwrap().risk_profile, profile);
        }
    }

    #[tokio::test]
    async fn test_empty_store_returns_none() {
        let store = InMemoryPortfolioStore::empty();
        assert!(store.find_by_risk_profile(RiskProfile::Balanced).await.unwrap().is_none());
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_allocation() {
        let bad = PortfolioDefinition::new(
            RiskProfile::Aggressive,
            "too much",
            AssetAllocation::new(80, 10, 5, 15),
            "#FF5733",
        );
        assert!(matches!(
            InMemoryPortfolioStore::new(vec![bad]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_profiles() {
        let mut definitions = PortfolioDefinition::defaults();
        definitions.push(PortfolioDefinition::new(
            RiskProfile::Balanced,
            "replacement",
            AssetAllocation::new(40, 40, 20, 0),
            "#000000",
        ));
        assert!(matches!(
            InMemoryPortfolioStore::new(definitions),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_new_orders_by_profile() {
        let mut defaults = PortfolioDefinition::defaults();
        defaults.reverse();
        let store = InMemoryPortfolioStore::new(defaults).unwrap();

        let profiles: Vec<_> = store
            .fetch_all()
            .await
            .unwrap()
            .iter()
            .map(|d| d.risk_profile)
            .collect();
        assert_eq!(profiles, RiskProfile::ALL.to_vec());
    }
}
