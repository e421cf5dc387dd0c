//! Unified error type for the ledger.
//!
//! Every layer returns [`Result`]; the HTTP layer maps variants onto status codes
//! in `api::error`.

use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All failures the ledger can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing configuration (env vars, seed file)
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable detail
        message: String,
    },

    /// Any failure raised by the database driver
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Negative amount supplied for a record
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Category label was empty after trimming
    #[error("Invalid category: {reason}")]
    CategoryInvalid {
        /// Why the category was rejected
        reason: String,
    },

    /// A budget for this category already exists
    #[error("A budget for category '{category}' already exists")]
    DuplicateCategory {
        /// The duplicated category
        category: String,
    },

    /// No record of the given kind with this id
    #[error("{kind} {id} not found")]
    RecordNotFound {
        /// Record kind, e.g. "Income"
        kind: &'static str,
        /// The missing id
        id: i64,
    },

    /// Request payload failed a field-level check
    #[error("{message}")]
    Validation {
        /// Which check failed
        message: String,
    },

    /// Registration with an email that is already taken
    #[error("User already exists")]
    UserExists,

    /// Email or password did not match
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed or expired token
    #[error("Not authorized, login again")]
    Unauthorized,

    /// Authenticated but not allowed to touch this resource
    #[error("Forbidden")]
    Forbidden,

    /// Feature needs configuration that is absent (e.g. admin credentials)
    #[error("{feature} is not configured on this server")]
    NotConfigured {
        /// The unavailable feature
        feature: &'static str,
    },

    /// Ticket was edited less than 24 hours ago
    #[error("You can only edit a ticket once every 24 hours")]
    EditTooSoon,

    /// Hashing or parsing a password hash failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Signing a token failed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Writing a CSV export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(value.to_string())
    }
}

impl Error {
    /// Turns a unique-index violation into `conflict()`; any other database error
    /// stays [`Error::Database`].
    pub fn on_unique_violation(err: DbErr, conflict: impl FnOnce() -> Self) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
