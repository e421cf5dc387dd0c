use crate::{
    api::{
        AppState,
        auth::require_user,
        error::{ApiJson, ApiPath},
    },
    core::{
        auth::{Claims, Role},
        user::{self, NewUser, PublicUser, UserUpdate},
    },
    errors::{Error, Result},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    token: String,
    token_type: &'static str,
    expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<PublicUser>,
}

impl AuthResponse {
    fn new(state: &AppState, token: String, user: Option<PublicUser>) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in: state.auth.expires_in().as_secs(),
            user,
        }
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let created = user::register_user(&state.database, payload).await?;
    let token = state.auth.issue_token(&created.id.to_string(), Role::User)?;
    let body = AuthResponse::new(&state, token, Some(created.into()));
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let found = user::authenticate_user(&state.database, &payload.email, &payload.password).await?;
    let token = state.auth.issue_token(&found.id.to_string(), Role::User)?;
    Ok(Json(AuthResponse::new(&state, token, Some(found.into()))))
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let token = state.auth.admin_login(&payload.email, &payload.password)?;
    Ok(Json(AuthResponse::new(&state, token, None)))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PublicUser>> {
    let user_id = require_user(&claims)?;
    Ok(Json(user::get_user(&state.database, user_id).await?.into()))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> Result<Json<PublicUser>> {
    if !claims.can_act_for(id) {
        return Err(Error::Forbidden);
    }
    Ok(Json(user::update_user(&state.database, id, payload).await?.into()))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    if !claims.can_act_for(id) {
        return Err(Error::Forbidden);
    }
    user::delete_user(&state.database, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
