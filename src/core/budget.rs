//! Budget business logic - per-category spending ceilings.
//!
//! Each category can carry at most one budget. The uniqueness check and the write run
//! inside one database transaction; the unique index on `budgets.category` remains the
//! final guard.

use crate::{
    config::budgets::SeedConfig,
    core::category::{Category, validate_amount},
    entities::{Budget, budget},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, warn};

/// Fields supplied when creating or replacing a budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    /// Category this budget caps
    pub category: Category,
    /// Allocated amount
    pub amount: Decimal,
}

/// Every budget in insertion order. This is the snapshot the aggregator reads.
pub async fn get_all_budgets(db: &DatabaseConnection) -> Result<Vec<budget::Model>> {
    Budget::find()
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a budget by id.
pub async fn get_budget_by_id(
    db: &DatabaseConnection,
    budget_id: i64,
) -> Result<Option<budget::Model>> {
    Budget::find_by_id(budget_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the budget for an exact category.
pub async fn get_budget_by_category<C>(db: &C, category: &str) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::Category.eq(category))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a budget, refusing a category that already has one.
pub async fn create_budget(db: &DatabaseConnection, input: NewBudget) -> Result<budget::Model> {
    let amount = validate_amount(input.amount)?;

    let txn = db.begin().await?;

    if get_budget_by_category(&txn, input.category.as_str())
        .await?
        .is_some()
    {
        return Err(Error::DuplicateCategory {
            category: input.category.into(),
        });
    }

    let category: String = input.category.into();
    let created = budget::ActiveModel {
        category: Set(category.clone()),
        amount: Set(amount),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| Error::on_unique_violation(e, || Error::DuplicateCategory { category }))?;

    txn.commit().await?;
    info!("Created budget {} for '{}'", created.id, created.category);
    Ok(created)
}

/// Replaces a budget's category and amount. Moving onto a category that another
/// budget already holds is refused.
pub async fn update_budget(
    db: &DatabaseConnection,
    budget_id: i64,
    input: NewBudget,
) -> Result<budget::Model> {
    let amount = validate_amount(input.amount)?;

    let txn = db.begin().await?;

    let mut model: budget::ActiveModel = Budget::find_by_id(budget_id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "Budget",
            id: budget_id,
        })?
        .into();

    let taken = get_budget_by_category(&txn, input.category.as_str())
        .await?
        .is_some_and(|other| other.id != budget_id);
    if taken {
        return Err(Error::DuplicateCategory {
            category: input.category.into(),
        });
    }

    let category: String = input.category.into();
    model.category = Set(category.clone());
    model.amount = Set(amount);
    let updated = model
        .update(&txn)
        .await
        .map_err(|e| Error::on_unique_violation(e, || Error::DuplicateCategory { category }))?;

    txn.commit().await?;
    Ok(updated)
}

/// Deletes a budget. Expenses in its category are untouched.
pub async fn delete_budget(db: &DatabaseConnection, budget_id: i64) -> Result<()> {
    let result = Budget::delete_by_id(budget_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "Budget",
            id: budget_id,
        });
    }
    Ok(())
}

/// Inserts the seeded budgets whose category has no budget yet.
///
/// Returns how many budgets were created. Invalid seed entries are logged and skipped.
pub async fn seed_budgets(db: &DatabaseConnection, seed: &SeedConfig) -> Result<usize> {
    info!(
        "Seeding budgets. Found {} configurations from TOML.",
        seed.budgets.len()
    );
    let mut created = 0;

    for entry in &seed.budgets {
        let category = match Category::parse(&entry.category) {
            Ok(category) => category,
            Err(e) => {
                warn!("Skipping seeded budget: {e}");
                continue;
            }
        };

        match create_budget(
            db,
            NewBudget {
                category,
                amount: entry.amount,
            },
        )
        .await
        {
            Ok(_) => created += 1,
            Err(Error::DuplicateCategory { category }) => {
                info!("Budget for '{category}' already exists. Skipping.");
            }
            Err(e @ Error::InvalidAmount { .. }) => {
                warn!("Skipping seeded budget '{}': {e}", entry.category);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}
