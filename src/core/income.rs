//! Income business logic - create, list, update and delete income records.
//!
//! All functions are async and return Result types for error handling. Input is
//! validated here, before anything reaches the database.

use crate::{
    core::{
        category::{Category, validate_amount},
        filter::RecordFilter,
    },
    entities::{Income, income},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::debug;

/// Fields supplied when creating or replacing an income.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    /// Grouping label
    pub category: Category,
    /// Amount received
    pub amount: Decimal,
    /// Day received
    pub date: NaiveDate,
    /// Optional note
    #[serde(default)]
    pub description: Option<String>,
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Records a new income after validating its amount.
pub async fn create_income(db: &DatabaseConnection, input: NewIncome) -> Result<income::Model> {
    let amount = validate_amount(input.amount)?;

    let model = income::ActiveModel {
        category: Set(input.category.into()),
        amount: Set(amount),
        date: Set(input.date),
        description: Set(clean_description(input.description)),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!("Created income {} ({})", created.id, created.category);
    Ok(created)
}

/// Lists incomes matching `filter`, newest first.
pub async fn list_incomes(
    db: &DatabaseConnection,
    filter: &RecordFilter,
) -> Result<Vec<income::Model>> {
    let mut query = Income::find();

    if let Some(category) = filter.category() {
        query = query.filter(income::Column::Category.eq(category));
    }
    if let Some(q) = filter.search_text() {
        query = query.filter(
            Condition::any()
                .add(income::Column::Category.contains(q))
                .add(income::Column::Description.contains(q)),
        );
    }
    if let Some(from) = filter.from {
        query = query.filter(income::Column::Date.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(income::Column::Date.lte(to));
    }

    query
        .order_by_desc(income::Column::Date)
        .order_by_desc(income::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an income by id.
pub async fn get_income_by_id(
    db: &DatabaseConnection,
    income_id: i64,
) -> Result<Option<income::Model>> {
    Income::find_by_id(income_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Replaces the editable fields of an existing income.
pub async fn update_income(
    db: &DatabaseConnection,
    income_id: i64,
    input: NewIncome,
) -> Result<income::Model> {
    let amount = validate_amount(input.amount)?;

    let mut model: income::ActiveModel = Income::find_by_id(income_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "Income",
            id: income_id,
        })?
        .into();

    model.category = Set(input.category.into());
    model.amount = Set(amount);
    model.date = Set(input.date);
    model.description = Set(clean_description(input.description));

    model.update(db).await.map_err(Into::into)
}

/// Deletes an income.
pub async fn delete_income(db: &DatabaseConnection, income_id: i64) -> Result<()> {
    let result = Income::delete_by_id(income_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "Income",
            id: income_id,
        });
    }
    Ok(())
}
