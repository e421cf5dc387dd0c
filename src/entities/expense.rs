//! Expense entity - money leaving the factory.
//!
//! Expenses are matched against budgets by their `category` string; there is no
//! foreign key between the two tables. Each expense carries an approval status that
//! starts as [`ExpenseStatus::Pending`].

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Approval state of an expense
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ExpenseStatus {
    /// Recorded but not yet signed off
    #[default]
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Signed off by management
    #[sea_orm(string_value = "Approved")]
    Approved,
}

impl ExpenseStatus {
    /// Wire and storage spelling of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
        }
    }
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Grouping label, compared verbatim with budget categories
    pub category: String,
    /// Amount spent, never negative
    pub amount: Decimal,
    /// Day the expense was incurred
    pub date: Date,
    /// Optional free-text note
    pub description: Option<String>,
    /// Approval status
    pub status: ExpenseStatus,
}

/// Expenses are linked to budgets by category text only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
