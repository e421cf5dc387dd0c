//! Income entity - money coming into the factory (tea sales, subsidies, ...).
//!
//! Each income row carries a free-text category, a non-negative amount, the date it
//! was received and an optional description.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Grouping label (e.g., "Tea Sales")
    pub category: String,
    /// Amount received, never negative
    pub amount: Decimal,
    /// Day the income was received
    pub date: Date,
    /// Optional free-text note
    pub description: Option<String>,
}

/// Incomes stand alone; they are not linked to any other table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
