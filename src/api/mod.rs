//! HTTP interface - axum router, handlers and auth middleware.
//!
//! Handlers are thin: they pull inputs out of the request, call into
//! [`crate::core`] and serialize the result. Errors surface as
//! [`crate::errors::Error`], which renders itself as `{code, message}`.

use crate::{config::server::ServerConfig, core::auth::AuthManager};
use axum::{
    Router,
    http::{HeaderValue, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Token middleware and role checks
pub mod auth;
mod budgets;
/// Error rendering and the JSON extractor
pub mod error;
mod expenses;
mod incomes;
mod reports;
mod tickets;
mod users;

/// Shared state handed to every handler.
pub struct AppState {
    /// Database connection pool
    pub database: DatabaseConnection,
    /// Token signer and validator
    pub auth: AuthManager,
}

async fn root() -> &'static str {
    "Tea ledger API is running"
}

async fn healthz() -> &'static str {
    "ok"
}

pub(crate) fn csv_response(filename: &str, body: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {o}");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Builds the full application router.
pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let protected = Router::new()
        .route("/user/profile", get(users::profile))
        .route(
            "/user/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/tickets",
            post(tickets::create_ticket).get(tickets::all_tickets),
        )
        .route("/tickets/mine", get(tickets::my_tickets))
        .route(
            "/tickets/{id}",
            put(tickets::update_ticket).delete(tickets::delete_ticket),
        )
        .route("/tickets/{id}/replies", post(tickets::reply))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_jwt,
        ));

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/incomes",
            get(incomes::list_incomes).post(incomes::create_income),
        )
        .route("/incomes/export.csv", get(incomes::export_incomes))
        .route(
            "/incomes/{id}",
            get(incomes::get_income)
                .put(incomes::update_income)
                .delete(incomes::delete_income),
        )
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/expenses/export.csv", get(expenses::export_expenses))
        .route(
            "/expenses/{id}",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route("/expenses/{id}/status", put(expenses::set_expense_status))
        .route(
            "/budgets",
            get(budgets::list_budgets).post(budgets::create_budget),
        )
        .route("/budgets/status", get(budgets::budget_statuses))
        .route("/budgets/summary", get(budgets::budget_summary))
        .route(
            "/budgets/{id}",
            get(budgets::get_budget)
                .put(budgets::update_budget)
                .delete(budgets::delete_budget),
        )
        .route("/reports/overview", get(reports::overview))
        .route("/categories", get(reports::categories))
        .route("/user/register", post(users::register))
        .route("/user/login", post(users::login))
        .route("/user/admin", post(users::admin_login))
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
