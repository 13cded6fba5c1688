use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{AssetAllocation, PortfolioDefinition, RiskProfile, DEFAULT_VISUALISATION_COLOR};

#[derive(Debug, FromRow)]
pub struct PortfolioDefinitionRow {
    pub risk_profile: String,
    pub description: String,
    pub stocks: i32,
    pub bonds: i32,
    pub cash: i32,
    pub crypto: i32,
    pub visualisation_color: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl TryFrom<PortfolioDefinitionRow> for PortfolioDefinition {
    type Error = sqlx::Error;

    fn try_from(row: PortfolioDefinitionRow) -> Result<Self, Self::Error> {
        let risk_profile = row
            .risk_profile
            .parse::<RiskProfile>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(PortfolioDefinition {
            risk_profile,
            description: row.description,
            asset_allocation: AssetAllocation::new(row.stocks, row.bonds, row.cash, row.crypto),
            visualisation_color: row
                .visualisation_color
                .unwrap_or_else(|| DEFAULT_VISUALISATION_COLOR.to_string()),
            last_updated: row.last_updated,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT risk_profile, description, stocks, bonds, cash, crypto,
                                     visualisation_color, last_updated
                              FROM portfolio_definitions";

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<PortfolioDefinition>, sqlx::Error> {
    let query = format!(
        "{} ORDER BY CASE risk_profile
                WHEN 'Conservative' THEN 0
                WHEN 'Balanced' THEN 1
                ELSE 2 END",
        SELECT_COLUMNS
    );
    sqlx::query_as::<_, PortfolioDefinitionRow>(&query)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(PortfolioDefinition::try_from)
        .collect()
}

pub async fn fetch_by_risk_profile(
    pool: &PgPool,
    risk_profile: RiskProfile,
) -> Result<Option<PortfolioDefinition>, sqlx::Error> {
    let query = format!("{} WHERE risk_profile = $1", SELECT_COLUMNS);
    sqlx::query_as::<_, PortfolioDefinitionRow>(&query)
        .bind(risk_profile.as_str())
        .fetch_optional(pool)
        .await?
        .map(PortfolioDefinition::try_from)
        .transpose()
}

/// Replaces every stored definition in one transaction. Callers validate allocations first.
pub async fn replace_all(
    pool: &PgPool,
    definitions: &[PortfolioDefinition],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM portfolio_definitions")
        .execute(&mut *tx)
        .await?;

    let mut inserted = 0;
    for definition in definitions {
        let allocation = definition.asset_allocation;
        let result = sqlx::query(
            "INSERT INTO portfolio_definitions
                (risk_profile, description, stocks, bonds, cash, crypto, visualisation_color, last_updated)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(definition.risk_profile.as_str())
        .bind(&definition.description)
        .bind(allocation.stocks)
        .bind(allocation.bonds)
        .bind(allocation.cash)
        .bind(allocation.crypto)
        .bind(&definition.visualisation_color)
        .bind(definition.last_updated)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(risk_profile: &str, color: Option<&str>) -> PortfolioDefinitionRow {
        PortfolioDefinitionRow {
            risk_profile: risk_profile.to_string(),
            description: "growth".to_string(),
            stocks: 70,
            bonds: 10,
            cash: 5,
            crypto: 15,
            visualisation_color: color.map(String::from),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_definition() {
        let definition = PortfolioDefinition::try_from(row("Aggressive", Some("#FF5733"))).unwrap();
        assert_eq!(definition.risk_profile, RiskProfile::Aggressive);
        assert_eq!(definition.asset_allocation, AssetAllocation::new(70, 10, 5, 15));
        assert_eq!(definition.visualisation_color, "#FF5733");
    }

    #[test]
    fn test_missing_color_uses_default() {
        let definition = PortfolioDefinition::try_from(row("Balanced", None)).unwrap();
        assert_eq!(definition.visualisation_color, DEFAULT_VISUALISATION_COLOR);
    }

    #[test]
    fn test_unknown_profile_is_decode_error() {
        let result = PortfolioDefinition::try_from(row("Speculative", None));
        assert!(matches!(result, Err(sqlx::Error::Decode(_))));
    }
}
