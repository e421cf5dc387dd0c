//! Password hashing and token issuing.

use crate::{
    config::auth::{AdminCredentials, AuthSettings},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Subject used for admin tokens.
pub const ADMIN_SUBJECT: &str = "admin";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `candidate` against a stored hash.
///
/// # Errors
/// `InvalidCredentials` on mismatch, `PasswordHash` when the stored hash is malformed.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(stored_hash)?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => Error::InvalidCredentials,
            other => other.into(),
        })
}

/// Who a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A registered user
    User,
    /// The configured administrator
    Admin,
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, or [`ADMIN_SUBJECT`]
    pub sub: String,
    /// Role of the subject
    pub role: Role,
    /// Issued-at, seconds since the epoch
    pub iat: u64,
    /// Expiry, seconds since the epoch
    pub exp: u64,
}

impl Claims {
    /// Whether the bearer is the administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The user id for user tokens; `None` for admin tokens.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        match self.role {
            Role::User => self.sub.parse().ok(),
            Role::Admin => None,
        }
    }

    /// Whether the bearer may act on behalf of `user_id`.
    #[must_use]
    pub fn can_act_for(&self, user_id: i64) -> bool {
        self.is_admin() || self.user_id() == Some(user_id)
    }
}

/// Signs and validates HS256 tokens.
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    admin: Option<AdminCredentials>,
}

impl AuthManager {
    /// Builds a manager from settings.
    #[must_use]
    pub fn new(settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(&settings.jwt_secret),
            decoding_key: DecodingKey::from_secret(&settings.jwt_secret),
            validation,
            token_ttl: settings.token_ttl,
            admin: settings.admin.clone(),
        }
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn expires_in(&self) -> Duration {
        self.token_ttl
    }

    /// Issues a token for `sub` valid from now.
    pub fn issue_token(&self, sub: &str, role: Role) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::Config {
                message: "System clock is before UNIX_EPOCH".to_string(),
            })?;
        self.issue_token_at(sub, role, now.as_secs())
    }

    fn issue_token_at(&self, sub: &str, role: Role, now_secs: u64) -> Result<String> {
        let claims = Claims {
            sub: sub.to_string(),
            role,
            iat: now_secs,
            exp: now_secs + self.token_ttl.as_secs(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Decodes and checks a token.
    ///
    /// # Errors
    /// `Unauthorized` for any expired, forged or malformed token.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                let rejected = matches!(
                    err.kind(),
                    ErrorKind::ExpiredSignature
                        | ErrorKind::InvalidToken
                        | ErrorKind::InvalidSignature
                        | ErrorKind::MissingRequiredClaim(_)
                        | ErrorKind::Base64(_)
                        | ErrorKind::Json(_)
                        | ErrorKind::Utf8(_)
                );
                if rejected { Error::Unauthorized } else { err.into() }
            })
    }

    /// Checks admin credentials and issues an admin token.
    ///
    /// # Errors
    /// `NotConfigured` when no admin is set up, `InvalidCredentials` on mismatch.
    pub fn admin_login(&self, email: &str, password: &str) -> Result<String> {
        let admin = self.admin.as_ref().ok_or(Error::NotConfigured {
            feature: "Admin login",
        })?;
        if admin.email != email.trim().to_lowercase() {
            return Err(Error::InvalidCredentials);
        }
        verify_password(password, &admin.password_hash)?;
        self.issue_token(ADMIN_SUBJECT, Role::Admin)
    }
}
