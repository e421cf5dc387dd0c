//! Expense business logic - create, list, update, approve and delete expenses.
//!
//! Expenses are the inputs of the budget aggregation in [`crate::core::report`].
//! Creating an expense does not touch any budget row: spend is always derived, never
//! stored.

use crate::{
    core::{
        category::{Category, validate_amount},
        filter::RecordFilter,
    },
    entities::{Expense, ExpenseStatus, expense},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, info};

/// Fields supplied when creating or replacing an expense.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Grouping label, matched verbatim against budgets
    pub category: Category,
    /// Amount spent
    pub amount: Decimal,
    /// Day incurred
    pub date: NaiveDate,
    /// Optional note
    #[serde(default)]
    pub description: Option<String>,
    /// Approval status; new expenses default to pending and updates keep the
    /// current status when omitted
    #[serde(default)]
    pub status: Option<ExpenseStatus>,
}

/// Expense listing criteria: the shared record filter plus an optional status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Category, text and date criteria
    #[serde(flatten)]
    pub record: RecordFilter,
    /// Only expenses in this status
    pub status: Option<ExpenseStatus>,
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Records a new expense. Status defaults to [`ExpenseStatus::Pending`].
pub async fn create_expense(db: &DatabaseConnection, input: NewExpense) -> Result<expense::Model> {
    let amount = validate_amount(input.amount)?;

    let model = expense::ActiveModel {
        category: Set(input.category.into()),
        amount: Set(amount),
        date: Set(input.date),
        description: Set(clean_description(input.description)),
        status: Set(input.status.unwrap_or_default()),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!(
        "Created expense {} ({}, {})",
        created.id,
        created.category,
        created.status.as_str()
    );
    Ok(created)
}

/// Lists expenses matching `filter`, newest first.
pub async fn list_expenses(
    db: &DatabaseConnection,
    filter: &ExpenseFilter,
) -> Result<Vec<expense::Model>> {
    let mut query = Expense::find();
    let record = &filter.record;

    if let Some(category) = record.category() {
        query = query.filter(expense::Column::Category.eq(category));
    }
    if let Some(q) = record.search_text() {
        query = query.filter(
            Condition::any()
                .add(expense::Column::Category.contains(q))
                .add(expense::Column::Description.contains(q)),
        );
    }
    if let Some(from) = record.from {
        query = query.filter(expense::Column::Date.gte(from));
    }
    if let Some(to) = record.to {
        query = query.filter(expense::Column::Date.lte(to));
    }
    if let Some(status) = filter.status {
        query = query.filter(expense::Column::Status.eq(status));
    }

    query
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every expense, in insertion order. This is the snapshot the aggregator reads.
pub async fn get_all_expenses(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    Expense::find()
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an expense by id.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn find_expense(db: &DatabaseConnection, expense_id: i64) -> Result<expense::Model> {
    get_expense_by_id(db, expense_id)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "Expense",
            id: expense_id,
        })
}

/// Replaces the editable fields of an expense. An omitted status is left unchanged.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    input: NewExpense,
) -> Result<expense::Model> {
    let amount = validate_amount(input.amount)?;
    let mut model: expense::ActiveModel = find_expense(db, expense_id).await?.into();

    model.category = Set(input.category.into());
    model.amount = Set(amount);
    model.date = Set(input.date);
    model.description = Set(clean_description(input.description));
    if let Some(status) = input.status {
        model.status = Set(status);
    }

    model.update(db).await.map_err(Into::into)
}

/// Moves an expense to `status` (e.g. approving a pending expense).
pub async fn set_expense_status(
    db: &DatabaseConnection,
    expense_id: i64,
    status: ExpenseStatus,
) -> Result<expense::Model> {
    let mut model: expense::ActiveModel = find_expense(db, expense_id).await?.into();
    model.status = Set(status);
    let updated = model.update(db).await?;
    info!("Expense {} is now {}", updated.id, status.as_str());
    Ok(updated)
}

/// Deletes an expense.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "Expense",
            id: expense_id,
        });
    }
    Ok(())
}
