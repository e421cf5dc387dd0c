//! Budget entity - the spending ceiling for one category.
//!
//! A budget does not track its own spend; the spent/remaining view is derived from
//! expenses on every read (see `core::report`).

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category this budget caps; unique across budgets
    #[sea_orm(unique)]
    pub category: String,
    /// Allocated amount, never negative
    pub amount: Decimal,
}

/// Budgets have no foreign-key relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
