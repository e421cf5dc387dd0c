use crate::{api::AppState, core::auth::Claims, errors::Error};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header some clients send the bare token in.
const TOKEN_HEADER: &str = "token";

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let mut parts = header.splitn(2, ' ');
        return match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("Bearer") => {
                Some(token.trim()).filter(|t| !t.is_empty())
            }
            _ => None,
        };
    }

    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a valid token and stores the [`Claims`] in the request
/// extensions for handlers to pick up.
pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let token = token_from_headers(request.headers()).ok_or(Error::Unauthorized)?;
    let claims = state.auth.validate_token(token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Fails with `Forbidden` unless the bearer is the administrator.
pub fn require_admin(claims: &Claims) -> Result<(), Error> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

/// The user id behind a user token; admin tokens have none.
pub fn require_user(claims: &Claims) -> Result<i64, Error> {
    claims.user_id().ok_or(Error::Forbidden)
}
