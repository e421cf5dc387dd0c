//! Support tickets raised by users and answered by the administrator.

use crate::{
    entities::{Ticket, TicketReply, User, ticket, ticket_reply, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Minimum time between two edits of the same ticket.
pub const EDIT_COOLDOWN: Duration = Duration::hours(24);

/// Fields supplied when raising a ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    /// Product line
    pub product_category: String,
    /// Product name
    pub product: String,
    /// Subject line
    pub subject: String,
    /// Inquiry text
    pub inquiry: String,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial edit; absent or blank fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    /// Product line
    pub product_category: Option<String>,
    /// Product name
    pub product: Option<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Inquiry text
    pub inquiry: Option<String>,
    /// Image URL
    pub image: Option<String>,
}

/// A ticket with its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    /// The ticket itself
    #[serde(flatten)]
    pub ticket: ticket::Model,
    /// Admin replies
    pub replies: Vec<ticket_reply::Model>,
}

/// Public details of a ticket's owner, for the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketOwner {
    /// Owner id
    pub id: i64,
    /// Owner name
    pub name: String,
    /// Owner email
    pub email: String,
    /// Owner profile picture
    pub profile_pic: Option<String>,
}

/// A ticket with replies and owner details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketWithOwner {
    /// Ticket and replies
    #[serde(flatten)]
    pub view: TicketView,
    /// Owner, if the account still exists
    pub owner: Option<TicketOwner>,
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn get_ticket(db: &DatabaseConnection, ticket_id: i64) -> Result<ticket::Model> {
    Ticket::find_by_id(ticket_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "Ticket",
            id: ticket_id,
        })
}

async fn attach_replies(
    db: &DatabaseConnection,
    tickets: Vec<ticket::Model>,
) -> Result<Vec<TicketView>> {
    let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
    let mut by_ticket: HashMap<i64, Vec<ticket_reply::Model>> = HashMap::new();
    if !ids.is_empty() {
        let replies = TicketReply::find()
            .filter(ticket_reply::Column::TicketId.is_in(ids))
            .order_by_asc(ticket_reply::Column::CreatedAt)
            .order_by_asc(ticket_reply::Column::Id)
            .all(db)
            .await?;
        for reply in replies {
            by_ticket.entry(reply.ticket_id).or_default().push(reply);
        }
    }

    Ok(tickets
        .into_iter()
        .map(|ticket| TicketView {
            replies: by_ticket.remove(&ticket.id).unwrap_or_default(),
            ticket,
        })
        .collect())
}

async fn view_of(db: &DatabaseConnection, ticket: ticket::Model) -> Result<TicketView> {
    let mut views = attach_replies(db, vec![ticket.clone()]).await?;
    Ok(views.pop().unwrap_or(TicketView {
        ticket,
        replies: Vec::new(),
    }))
}

/// Raises a ticket for `user_id`.
pub async fn create_ticket(
    db: &DatabaseConnection,
    user_id: i64,
    input: NewTicket,
) -> Result<TicketView> {
    let product_category = required("productCategory", &input.product_category)?;
    let product = required("product", &input.product)?;
    let subject = required("subject", &input.subject)?;
    let inquiry = required("inquiry", &input.inquiry)?;

    let now = Utc::now();
    let model = ticket::ActiveModel {
        user_id: Set(user_id),
        product_category: Set(product_category),
        product: Set(product),
        subject: Set(subject),
        inquiry: Set(inquiry),
        image: Set(non_blank(input.image)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!("User {user_id} raised ticket {}", created.id);
    Ok(TicketView {
        ticket: created,
        replies: Vec::new(),
    })
}

/// Lists a user's tickets, newest first.
pub async fn list_user_tickets(db: &DatabaseConnection, user_id: i64) -> Result<Vec<TicketView>> {
    let tickets = Ticket::find()
        .filter(ticket::Column::UserId.eq(user_id))
        .order_by_desc(ticket::Column::CreatedAt)
        .order_by_desc(ticket::Column::Id)
        .all(db)
        .await?;
    attach_replies(db, tickets).await
}

/// Lists every ticket with owner details, newest first.
pub async fn list_all_tickets(db: &DatabaseConnection) -> Result<Vec<TicketWithOwner>> {
    let rows = Ticket::find()
        .find_also_related(User)
        .order_by_desc(ticket::Column::CreatedAt)
        .order_by_desc(ticket::Column::Id)
        .all(db)
        .await?;

    let mut owners: HashMap<i64, TicketOwner> = HashMap::new();
    let mut tickets = Vec::with_capacity(rows.len());
    for (ticket, owner) in rows {
        if let Some(owner) = owner {
            owners.insert(ticket.id, owner_of(owner));
        }
        tickets.push(ticket);
    }

    Ok(attach_replies(db, tickets)
        .await?
        .into_iter()
        .map(|view| TicketWithOwner {
            owner: owners.remove(&view.ticket.id),
            view,
        })
        .collect())
}

fn owner_of(user: user::Model) -> TicketOwner {
    TicketOwner {
        id: user.id,
        name: user.name,
        email: user.email,
        profile_pic: user.profile_pic,
    }
}

/// Edits a ticket owned by `user_id`, at most once per [`EDIT_COOLDOWN`].
///
/// # Errors
/// `RecordNotFound` when the ticket does not exist, `Forbidden` when it belongs to
/// someone else, `EditTooSoon` inside the cooldown window.
pub async fn update_ticket(
    db: &DatabaseConnection,
    ticket_id: i64,
    user_id: i64,
    update: TicketUpdate,
    now: DateTime<Utc>,
) -> Result<TicketView> {
    let existing = get_ticket(db, ticket_id).await?;
    if existing.user_id != user_id {
        return Err(Error::Forbidden);
    }
    if now - existing.updated_at < EDIT_COOLDOWN {
        return Err(Error::EditTooSoon);
    }

    let mut model: ticket::ActiveModel = existing.into();
    if let Some(v) = non_blank(update.product_category) {
        model.product_category = Set(v);
    }
    if let Some(v) = non_blank(update.product) {
        model.product = Set(v);
    }
    if let Some(v) = non_blank(update.subject) {
        model.subject = Set(v);
    }
    if let Some(v) = non_blank(update.inquiry) {
        model.inquiry = Set(v);
    }
    if let Some(v) = non_blank(update.image) {
        model.image = Set(Some(v));
    }
    model.updated_at = Set(now);

    let updated = model.update(db).await?;
    debug!("Updated ticket {}", updated.id);
    view_of(db, updated).await
}

/// Deletes a ticket and its replies. With `owner` set, only that user's ticket
/// may be deleted.
pub async fn delete_ticket(
    db: &DatabaseConnection,
    ticket_id: i64,
    owner: Option<i64>,
) -> Result<()> {
    let existing = get_ticket(db, ticket_id).await?;
    if owner.is_some_and(|id| id != existing.user_id) {
        return Err(Error::Forbidden);
    }

    let txn = db.begin().await?;
    TicketReply::delete_many()
        .filter(ticket_reply::Column::TicketId.eq(ticket_id))
        .exec(&txn)
        .await?;
    Ticket::delete_by_id(ticket_id).exec(&txn).await?;
    txn.commit().await?;

    info!("Deleted ticket {ticket_id}");
    Ok(())
}

/// Appends an admin reply to a ticket.
pub async fn reply_to_ticket(
    db: &DatabaseConnection,
    ticket_id: i64,
    message: &str,
) -> Result<TicketView> {
    let message = required("message", message)?;
    let ticket = get_ticket(db, ticket_id).await?;

    ticket_reply::ActiveModel {
        ticket_id: Set(ticket_id),
        message: Set(message),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("Replied to ticket {ticket_id}");
    view_of(db, ticket).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn new_ticket(subject: &str) -> NewTicket {
        NewTicket {
            product_category: "Black Tea".to_string(),
            product: "BOPF".to_string(),
            subject: subject.to_string(),
            inquiry: "Is the next lot available?".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_ticket_requires_fields() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = create_ticket(&db, 1, new_ticket("  ")).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_and_list_own_tickets() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@estate.test").await?;
        let other = create_test_user(&db, "other@estate.test").await?;

        let created = create_ticket(&db, owner.id, new_ticket("Lot 12")).await?;
        assert_eq!(created.ticket.subject, "Lot 12");
        assert!(created.replies.is_empty());
        create_ticket(&db, other.id, new_ticket("Lot 13")).await?;

        let mine = list_user_tickets(&db, owner.id).await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].ticket.id, created.ticket.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_blocked_within_cooldown() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@estate.test").await?;
        let ticket = create_test_ticket(&db, owner.id, "Lot 12").await?;

        let soon = ticket.updated_at + Duration::hours(23);
        let result = update_ticket(
            &db,
            ticket.id,
            owner.id,
            TicketUpdate {
                subject: Some("Lot 14".to_string()),
                ..Default::default()
            },
            soon,
        )
        .await;
        assert!(matches!(result, Err(Error::EditTooSoon)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_after_cooldown_changes_only_given_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@estate.test").await?;
        let ticket = create_test_ticket(&db, owner.id, "Lot 12").await?;

        let later = ticket.updated_at + EDIT_COOLDOWN;
        let updated = update_ticket(
            &db,
            ticket.id,
            owner.id,
            TicketUpdate {
                subject: Some("Lot 14".to_string()),
                inquiry: Some("   ".to_string()),
                ..Default::default()
            },
            later,
        )
        .await?;
        assert_eq!(updated.ticket.subject, "Lot 14");
        assert_eq!(updated.ticket.inquiry, ticket.inquiry);
        assert_eq!(updated.ticket.updated_at, later);

        // the edit restarts the cooldown
        let again = update_ticket(
            &db,
            ticket.id,
            owner.id,
            TicketUpdate::default(),
            later + Duration::hours(1),
        )
        .await;
        assert!(matches!(again, Err(Error::EditTooSoon)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_someone_elses_ticket() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@estate.test").await?;
        let intruder = create_test_user(&db, "intruder@estate.test").await?;
        let ticket = create_test_ticket(&db, owner.id, "Lot 12").await?;

        let result = update_ticket(
            &db,
            ticket.id,
            intruder.id,
            TicketUpdate::default(),
            ticket.updated_at + Duration::days(2),
        )
        .await;
        assert!(matches!(result, Err(Error::Forbidden)));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ticket_rules() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@estate.test").await?;
        let intruder = create_test_user(&db, "intruder@estate.test").await?;
        let first = create_test_ticket(&db, owner.id, "Lot 12").await?;
        let second = create_test_ticket(&db, owner.id, "Lot 13").await?;
        reply_to_ticket(&db, first.id, "Noted").await?;

        assert!(matches!(
            delete_ticket(&db, first.id, Some(intruder.id)).await,
            Err(Error::Forbidden)
        ));
        delete_ticket(&db, first.id, Some(owner.id)).await?;
        // admins delete without an owner check
        delete_ticket(&db, second.id, None).await?;

        assert_eq!(Ticket::find().count(&db).await?, 0);
        assert_eq!(TicketReply::find().count(&db).await?, 0);
        assert!(matches!(
            delete_ticket(&db, first.id, None).await,
            Err(Error::RecordNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_replies_and_admin_listing() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "owner@estate.test").await?;
        let ticket = create_test_ticket(&db, owner.id, "Lot 12").await?;

        reply_to_ticket(&db, ticket.id, "Checking stock").await?;
        let view = reply_to_ticket(&db, ticket.id, "Available next week").await?;
        let messages: Vec<&str> = view.replies.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["Checking stock", "Available next week"]);

        let all = list_all_tickets(&db).await?;
        assert_eq!(all.len(), 1);
        let entry = &all[0];
        assert_eq!(entry.view.replies.len(), 2);
        let owner_info = entry.owner.as_ref().map(|o| o.email.as_str());
        assert_eq!(owner_info, Some("owner@estate.test"));

        assert!(matches!(
            reply_to_ticket(&db, ticket.id, " ").await,
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            reply_to_ticket(&db, 999, "hello").await,
            Err(Error::RecordNotFound { .. })
        ));
        Ok(())
    }
}
