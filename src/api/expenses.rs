use crate::{
    api::{
        AppState, csv_response,
        error::{ApiJson, ApiPath, ApiQuery},
    },
    core::{
        expense::{self, ExpenseFilter, NewExpense},
        export,
    },
    entities::{ExpenseModel, ExpenseStatus},
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct StatusUpdate {
    status: ExpenseStatus,
}

pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ExpenseFilter>,
) -> Result<Json<Vec<ExpenseModel>>> {
    Ok(Json(expense::list_expenses(&state.database, &filter).await?))
}

pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewExpense>,
) -> Result<(StatusCode, Json<ExpenseModel>)> {
    let created = expense::create_expense(&state.database, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ExpenseModel>> {
    expense::get_expense_by_id(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::RecordNotFound {
            kind: "Expense",
            id,
        })
}

pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewExpense>,
) -> Result<Json<ExpenseModel>> {
    Ok(Json(
        expense::update_expense(&state.database, id, payload).await?,
    ))
}

pub async fn set_expense_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<StatusUpdate>,
) -> Result<Json<ExpenseModel>> {
    Ok(Json(
        expense::set_expense_status(&state.database, id, payload.status).await?,
    ))
}

pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    expense::delete_expense(&state.database, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_expenses(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ExpenseFilter>,
) -> Result<Response> {
    let expenses = expense::list_expenses(&state.database, &filter).await?;
    Ok(csv_response("expenses.csv", export::expenses_to_csv(&expenses)?))
}
