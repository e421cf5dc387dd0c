use crate::{
    api::{
        AppState,
        auth::{require_admin, require_user},
        error::{ApiJson, ApiPath},
    },
    core::{
        auth::Claims,
        ticket::{self, NewTicket, TicketUpdate, TicketView, TicketWithOwner},
    },
    errors::Result,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ReplyRequest {
    message: String,
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(payload): ApiJson<NewTicket>,
) -> Result<(StatusCode, Json<TicketView>)> {
    let user_id = require_user(&claims)?;
    let created = ticket::create_ticket(&state.database, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn my_tickets(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<TicketView>>> {
    let user_id = require_user(&claims)?;
    Ok(Json(ticket::list_user_tickets(&state.database, user_id).await?))
}

pub async fn all_tickets(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<TicketWithOwner>>> {
    require_admin(&claims)?;
    Ok(Json(ticket::list_all_tickets(&state.database).await?))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TicketUpdate>,
) -> Result<Json<TicketView>> {
    let user_id = require_user(&claims)?;
    Ok(Json(
        ticket::update_ticket(&state.database, id, user_id, payload, Utc::now()).await?,
    ))
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    let owner = if claims.is_admin() {
        None
    } else {
        Some(require_user(&claims)?)
    };
    ticket::delete_ticket(&state.database, id, owner).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reply(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ReplyRequest>,
) -> Result<(StatusCode, Json<TicketView>)> {
    require_admin(&claims)?;
    let view = ticket::reply_to_ticket(&state.database, id, &payload.message).await?;
    Ok((StatusCode::CREATED, Json(view)))
}
