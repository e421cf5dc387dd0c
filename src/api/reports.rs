use crate::{
    api::{AppState, error::ApiQuery},
    core::{category, report::{self, FinancialOverview}},
    errors::Result,
};
use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct OverviewQuery {
    year: Option<i32>,
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    prefix: String,
}

pub async fn overview(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<OverviewQuery>,
) -> Result<Json<FinancialOverview>> {
    Ok(Json(
        report::generate_overview(&state.database, query.year).await?,
    ))
}

/// Category autocomplete across incomes, expenses and budgets.
pub async fn categories(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(
        category::suggest_categories(&state.database, &query.prefix).await?,
    ))
}
