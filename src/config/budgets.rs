//! Budget seed loading from config.toml
//!
//! The seed file lists the budget categories a fresh installation should start
//! with. Seeding happens at startup and only inserts categories that do not yet have
//! a budget, so edits made through the API survive restarts.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire seed file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Budgets to create when missing
    #[serde(default)]
    pub budgets: Vec<BudgetSeed>,
}

/// Configuration for a single seeded budget
#[derive(Debug, Deserialize, Clone)]
pub struct BudgetSeed {
    /// Category the budget caps
    pub category: String,
    /// Allocated amount
    pub amount: Decimal,
}

/// Loads the budget seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path.as_ref().display()),
    })?;

    parse_seed_config(&contents)
}

/// Parses seed configuration from TOML text.
pub fn parse_seed_config(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads the seed file named by `SEED_CONFIG` (default `config.toml`).
///
/// A missing file is not an error: the server simply starts without seeded budgets.
pub fn load_default_seed_config() -> Result<Option<SeedConfig>> {
    let path = std::env::var("SEED_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No seed file at {path}, skipping budget seeding");
        return Ok(None);
    }
    load_seed_config(&path).map(Some)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_budget_seed() {
        let toml_str = r#"
            [[budgets]]
            category = "Raw Materials"
            amount = 250000

            [[budgets]]
            category = "Transport"
            amount = 1000.50
        "#;

        let config = parse_seed_config(toml_str).unwrap();
        assert_eq!(config.budgets.len(), 2);
        assert_eq!(config.budgets[0].category, "Raw Materials");
        assert_eq!(config.budgets[0].amount, dec!(250000));
        assert_eq!(config.budgets[1].amount, dec!(1000.50));
    }

    #[test]
    fn test_parse_empty_seed() {
        let config = parse_seed_config("").unwrap();
        assert!(config.budgets.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_amount() {
        let result = parse_seed_config(
            r#"
            [[budgets]]
            category = "Transport"
        "#,
        );
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
