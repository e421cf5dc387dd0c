//! Token and admin credential settings read from the environment.

use super::server::var_or;
use crate::errors::{Error, Result};
use std::time::Duration;

/// Admin login credentials; the password is kept only as an Argon2 hash.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    /// Admin login email
    pub email: String,
    /// Argon2 PHC string of the admin password
    pub password_hash: String,
}

/// Everything needed to issue and check tokens.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HMAC secret for HS256 tokens
    pub jwt_secret: Vec<u8>,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Admin login, when configured
    pub admin: Option<AdminCredentials>,
}

impl AuthSettings {
    /// Reads `JWT_SECRET`, `JWT_TTL_SECS`, `ADMIN_EMAIL` and `ADMIN_PASSWORD_HASH`.
    ///
    /// # Errors
    /// Fails when `JWT_SECRET` is missing or empty, or `JWT_TTL_SECS` is not a number.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")?;
        if secret.trim().is_empty() {
            return Err(Error::Config {
                message: "JWT_SECRET cannot be empty".to_string(),
            });
        }
        let ttl_secs: u64 = var_or("JWT_TTL_SECS", "86400")
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid JWT_TTL_SECS: {e}"),
            })?;

        let admin = match (
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD_HASH"),
        ) {
            (Ok(email), Ok(password_hash))
                if !email.trim().is_empty() && !password_hash.trim().is_empty() =>
            {
                Some(AdminCredentials {
                    email: email.trim().to_lowercase(),
                    password_hash: password_hash.trim().to_string(),
                })
            }
            _ => None,
        };

        Ok(Self {
            jwt_secret: secret.into_bytes(),
            token_ttl: Duration::from_secs(ttl_secs),
            admin,
        })
    }
}
