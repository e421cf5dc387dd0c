//! Ticket reply entity - an admin answer appended to a ticket.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ticket reply database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "ticket_replies")]
pub struct Model {
    /// Unique identifier for the reply
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ticket this reply answers
    pub ticket_id: i64,
    /// Reply text
    pub message: String,
    /// When the reply was sent
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `TicketReply` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each reply belongs to one ticket
    #[sea_orm(
        belongs_to = "super::ticket::Entity",
        from = "Column::TicketId",
        to = "super::ticket::Column::Id"
    )]
    Ticket,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
