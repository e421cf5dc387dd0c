//! Categories - the text label that links expenses to budgets.
//!
//! Income, expense and budget inputs all carry a [`Category`]. Construction trims
//! surrounding whitespace and rejects empty labels; after that, matching is exact and
//! case-sensitive ("Tea Sales" and "tea sales" are different categories).

use crate::{
    entities::{Budget, Expense, Income, budget, expense, income},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// Maximum number of suggestions returned by [`suggest_categories`].
pub const MAX_SUGGESTIONS: usize = 25;

/// Largest amount a single record may carry, 10^15.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// A validated category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Validates and trims a raw label.
    ///
    /// # Errors
    /// Returns `CategoryInvalid` when the label is empty or whitespace-only.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::CategoryInvalid {
                reason: "category cannot be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The label as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejects negative amounts and amounts above [`MAX_AMOUNT`]; shared by every record kind.
pub fn validate_amount(amount: Decimal) -> Result<Decimal> {
    if (amount.is_sign_negative() && !amount.is_zero()) || amount > MAX_AMOUNT {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Every distinct category used by an income, expense or budget, sorted.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<String>> {
    let incomes: Vec<String> = Income::find()
        .select_only()
        .column(income::Column::Category)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let expenses: Vec<String> = Expense::find()
        .select_only()
        .column(expense::Column::Category)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let budgets: Vec<String> = Budget::find()
        .select_only()
        .column(budget::Column::Category)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    let all: BTreeSet<String> = incomes.into_iter().chain(expenses).chain(budgets).collect();
    Ok(all.into_iter().collect())
}

/// Suggests known categories starting with `prefix` (case-insensitive), for form
/// autocomplete. Returns at most [`MAX_SUGGESTIONS`] entries in alphabetical order.
pub async fn suggest_categories(db: &DatabaseConnection, prefix: &str) -> Result<Vec<String>> {
    let prefix_lower = prefix.trim().to_lowercase();
    let matching = get_all_categories(db)
        .await?
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix_lower))
        .take(MAX_SUGGESTIONS)
        .collect();
    Ok(matching)
}
