//! User accounts - registration, login and profile maintenance.
//!
//! Emails are normalized to lowercase before every lookup and write. Passwords are
//! only ever stored as Argon2 hashes.

use crate::{
    core::auth::{MIN_PASSWORD_LEN, hash_password, verify_password},
    entities::{Ticket, TicketReply, User, ticket, ticket_reply, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Partial update; absent or blank fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New display name
    pub name: Option<String>,
    /// New login email
    pub email: Option<String>,
    /// New password
    pub password: Option<String>,
    /// New profile picture URL
    pub profile_pic: Option<String>,
}

/// The parts of a user safe to hand to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Profile picture URL
    pub profile_pic: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for PublicUser {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            profile_pic: model.profile_pic,
            created_at: model.created_at,
        }
    }
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

fn normalize_email(raw: &str) -> Result<String> {
    let email = required("email", raw)?.to_lowercase();
    if !email.contains('@') {
        return Err(Error::Validation {
            message: "Please enter a valid email".to_string(),
        });
    }
    Ok(email)
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation {
            message: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(())
}

async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates an account.
///
/// # Errors
/// `Validation` for missing fields, a malformed email or a short password;
/// `UserExists` when the email is taken.
pub async fn register_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model> {
    let name = required("name", &input.name)?;
    let email = normalize_email(&input.email)?;
    validate_password(&input.password)?;

    if find_by_email(db, &email).await?.is_some() {
        return Err(Error::UserExists);
    }

    let now = Utc::now();
    let model = user::ActiveModel {
        name: Set(name),
        email: Set(email),
        password_hash: Set(hash_password(&input.password)?),
        profile_pic: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model
        .insert(db)
        .await
        .map_err(|e| Error::on_unique_violation(e, || Error::UserExists))?;
    info!("Registered user {}", created.id);
    Ok(created)
}

/// Looks up a user by email and checks the password.
///
/// # Errors
/// `InvalidCredentials` for an unknown email or a wrong password alike.
pub async fn authenticate_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let email = email.trim().to_lowercase();
    let user = find_by_email(db, &email)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    verify_password(password, &user.password_hash)?;
    Ok(user)
}

/// Gets a user by id.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "User",
            id: user_id,
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Applies a partial update to a user.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    update: UserUpdate,
) -> Result<user::Model> {
    let existing = get_user(db, user_id).await?;
    let mut model: user::ActiveModel = existing.into();

    if let Some(name) = non_blank(update.name) {
        model.name = Set(name);
    }
    if let Some(raw) = non_blank(update.email) {
        let email = normalize_email(&raw)?;
        if find_by_email(db, &email)
            .await?
            .is_some_and(|other| other.id != user_id)
        {
            return Err(Error::UserExists);
        }
        model.email = Set(email);
    }
    if let Some(password) = update.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        model.password_hash = Set(hash_password(&password)?);
    }
    if let Some(pic) = non_blank(update.profile_pic) {
        model.profile_pic = Set(Some(pic));
    }
    model.updated_at = Set(Utc::now());

    let updated = model
        .update(db)
        .await
        .map_err(|e| Error::on_unique_violation(e, || Error::UserExists))?;
    debug!("Updated user {}", updated.id);
    Ok(updated)
}

/// Deletes a user together with their tickets and the replies to them.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let ticket_ids: Vec<i64> = Ticket::find()
        .filter(ticket::Column::UserId.eq(user_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    if !ticket_ids.is_empty() {
        TicketReply::delete_many()
            .filter(ticket_reply::Column::TicketId.is_in(ticket_ids))
            .exec(&txn)
            .await?;
        Ticket::delete_many()
            .filter(ticket::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
    }

    let result = User::delete_by_id(user_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "User",
            id: user_id,
        });
    }

    txn.commit().await?;
    info!("Deleted user {user_id}");
    Ok(())
}
