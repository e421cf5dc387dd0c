//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{
    config::auth::{AdminCredentials, AuthSettings},
    core::{
        auth::hash_password,
        budget::{self, NewBudget},
        category::Category,
        expense::{self, NewExpense},
        income::{self, NewIncome},
        ticket::{self, NewTicket},
        user::{self, NewUser},
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::time::Duration;

/// Password used by [`create_test_user`].
pub const TEST_PASSWORD: &str = "estate-password";

/// Admin password matching [`test_auth_settings`].
pub const TEST_ADMIN_PASSWORD: &str = "factory-admin";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date; panics on an impossible date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn category(raw: &str) -> Category {
    Category::parse(raw).expect("valid test category")
}

/// Creates a test income dated 2026-01-15 with no description.
pub async fn create_test_income(
    db: &DatabaseConnection,
    category_name: &str,
    amount: Decimal,
) -> Result<entities::income::Model> {
    create_custom_income(db, category_name, amount, date(2026, 1, 15), None).await
}

/// Creates a test income with a custom date and description.
pub async fn create_custom_income(
    db: &DatabaseConnection,
    category_name: &str,
    amount: Decimal,
    on: NaiveDate,
    description: Option<&str>,
) -> Result<entities::income::Model> {
    income::create_income(
        db,
        NewIncome {
            category: category(category_name),
            amount,
            date: on,
            description: description.map(str::to_string),
        },
    )
    .await
}

/// Creates a pending test expense dated 2026-01-15.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    category_name: &str,
    amount: Decimal,
) -> Result<entities::expense::Model> {
    create_custom_expense(db, category_name, amount, date(2026, 1, 15)).await
}

/// Creates a pending test expense on a custom date.
pub async fn create_custom_expense(
    db: &DatabaseConnection,
    category_name: &str,
    amount: Decimal,
    on: NaiveDate,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        NewExpense {
            category: category(category_name),
            amount,
            date: on,
            description: None,
            status: None,
        },
    )
    .await
}

/// Creates a test budget.
pub async fn create_test_budget(
    db: &DatabaseConnection,
    category_name: &str,
    amount: Decimal,
) -> Result<entities::budget::Model> {
    budget::create_budget(
        db,
        NewBudget {
            category: category(category_name),
            amount,
        },
    )
    .await
}

/// Registers a test user with [`TEST_PASSWORD`].
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    user::register_user(
        db,
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        },
    )
    .await
}

/// Raises a test ticket for `user_id`.
pub async fn create_test_ticket(
    db: &DatabaseConnection,
    user_id: i64,
    subject: &str,
) -> Result<entities::ticket::Model> {
    let view = ticket::create_ticket(
        db,
        user_id,
        NewTicket {
            product_category: "Green Tea".to_string(),
            product: "Sencha".to_string(),
            subject: subject.to_string(),
            inquiry: "When is the next shipment?".to_string(),
            image: None,
        },
    )
    .await?;
    Ok(view.ticket)
}

/// Auth settings with a fixed secret, a one-day token lifetime and an admin
/// `admin@factory.test` / [`TEST_ADMIN_PASSWORD`].
pub fn test_auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: b"test-secret-for-ledger-tokens".to_vec(),
        token_ttl: Duration::from_secs(86_400),
        admin: Some(AdminCredentials {
            email: "admin@factory.test".to_string(),
            password_hash: hash_password(TEST_ADMIN_PASSWORD).unwrap(),
        }),
    }
}
