use crate::{
    api::{
        AppState,
        error::{ApiJson, ApiPath},
    },
    core::{
        budget::{self, NewBudget},
        report::{self, BudgetStatus, BudgetSummary},
    },
    entities::BudgetModel,
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

pub async fn list_budgets(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BudgetModel>>> {
    Ok(Json(budget::get_all_budgets(&state.database).await?))
}

pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewBudget>,
) -> Result<(StatusCode, Json<BudgetModel>)> {
    let created = budget::create_budget(&state.database, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<BudgetModel>> {
    budget::get_budget_by_id(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::RecordNotFound { kind: "Budget", id })
}

pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewBudget>,
) -> Result<Json<BudgetModel>> {
    Ok(Json(budget::update_budget(&state.database, id, payload).await?))
}

pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    budget::delete_budget(&state.database, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Spend-vs-budget for every budget.
pub async fn budget_statuses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BudgetStatus>>> {
    Ok(Json(report::generate_budget_statuses(&state.database).await?))
}

pub async fn budget_summary(State(state): State<Arc<AppState>>) -> Result<Json<BudgetSummary>> {
    Ok(Json(report::generate_budget_summary(&state.database).await?))
}
