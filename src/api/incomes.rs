use crate::{
    api::{
        AppState, csv_response,
        error::{ApiJson, ApiPath, ApiQuery},
    },
    core::{
        export,
        filter::RecordFilter,
        income::{self, NewIncome},
    },
    entities::IncomeModel,
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode, response::Response};
use std::sync::Arc;

pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<RecordFilter>,
) -> Result<Json<Vec<IncomeModel>>> {
    Ok(Json(income::list_incomes(&state.database, &filter).await?))
}

pub async fn create_income(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewIncome>,
) -> Result<(StatusCode, Json<IncomeModel>)> {
    let created = income::create_income(&state.database, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_income(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<IncomeModel>> {
    income::get_income_by_id(&state.database, id)
        .await?
        .map(Json)
        .ok_or(Error::RecordNotFound { kind: "Income", id })
}

pub async fn update_income(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewIncome>,
) -> Result<Json<IncomeModel>> {
    Ok(Json(income::update_income(&state.database, id, payload).await?))
}

pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    income::delete_income(&state.database, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_incomes(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<RecordFilter>,
) -> Result<Response> {
    let incomes = income::list_incomes(&state.database, &filter).await?;
    Ok(csv_response("incomes.csv", export::incomes_to_csv(&incomes)?))
}
