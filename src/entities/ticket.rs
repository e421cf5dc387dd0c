//! Ticket entity - a support inquiry raised by a user about a product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ticket database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    /// Unique identifier for the ticket
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the ticket
    pub user_id: i64,
    /// Product line (e.g., "Black Tea")
    pub product_category: String,
    /// Specific product name
    pub product: String,
    /// Short subject line
    pub subject: String,
    /// Body of the inquiry
    pub inquiry: String,
    /// URL of an attached image, if any
    pub image: Option<String>,
    /// When the ticket was raised
    pub created_at: DateTimeUtc,
    /// When the ticket was last edited
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Ticket and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ticket belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One ticket collects many replies
    #[sea_orm(has_many = "super::ticket_reply::Entity")]
    Replies,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::ticket_reply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Replies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
