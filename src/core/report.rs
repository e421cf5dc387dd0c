//! Report generation business logic.
//!
//! This module derives everything the dashboards show from snapshots of the record
//! tables: budget-vs-spend per category, the budget page totals and the financial
//! overview. The computations are pure functions over slices; the async `generate_*`
//! wrappers only fetch the snapshot first. Nothing derived here is ever stored.

use crate::{
    core::{budget, expense, income},
    entities::{budget as budget_entity, expense as expense_entity, income as income_entity},
    errors::Result,
};
use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const RECENT_EXPENSES: usize = 4;
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Spend-vs-budget for one budget category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// Budget category
    pub category: String,
    /// Allocated amount
    pub budget_amount: Decimal,
    /// Sum of expenses in this category
    pub spent: Decimal,
    /// `budget_amount - spent`; negative when overspent
    pub remaining: Decimal,
    /// `spent / budget_amount * 100`, 0 for a zero budget
    pub percent_used: Decimal,
    /// Whether `remaining < 0`
    pub exceeded: bool,
}

/// Totals shown at the top of the budget page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Sum of all budget amounts
    pub total_budget: Decimal,
    /// Sum of spend over budgeted categories only
    pub total_spent: Decimal,
    /// `total_budget - total_spent`
    pub total_remaining: Decimal,
    /// `total_spent / total_budget * 100`, 0 when nothing is budgeted
    pub percent_spent: Decimal,
    /// All expenses divided by the number of distinct months they fall in
    pub monthly_average_expense: Decimal,
    /// Most recent expenses by date, newest first
    pub recent_expenses: Vec<expense_entity::Model>,
}

/// Income, expense and profit for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Month number, 1-12
    pub month: u32,
    /// Short month name
    pub label: &'static str,
    /// Income received in the month
    pub income: Decimal,
    /// Expenses incurred in the month
    pub expense: Decimal,
    /// `income - expense`
    pub profit: Decimal,
}

/// Sum of amounts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// Category label
    pub category: String,
    /// Summed amount
    pub total: Decimal,
}

/// Revenue, expense and profit over the selected period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    /// Year the figures are restricted to, if any
    pub year: Option<i32>,
    /// Sum of incomes
    pub total_revenue: Decimal,
    /// Sum of expenses
    pub total_expense: Decimal,
    /// `total_revenue - total_expense`
    pub profit: Decimal,
    /// Twelve entries, January first
    pub monthly: Vec<MonthlyTrend>,
    /// Income per category, in order of first appearance
    pub income_by_category: Vec<CategoryTotal>,
    /// Expense per category, in order of first appearance
    pub expense_by_category: Vec<CategoryTotal>,
}

/// Percentage of `part` in `whole`, rounded to 2 places; 0 when `whole` is 0.
///
/// Ratios beyond the `Decimal` range saturate at [`Decimal::MAX`].
#[must_use]
pub fn calculate_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }

    part.checked_div(whole)
        .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(HUNDRED))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums amounts, saturating instead of overflowing.
fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

fn spent_by_category(expenses: &[expense_entity::Model]) -> HashMap<&str, Decimal> {
    let mut spent: HashMap<&str, Decimal> = HashMap::new();
    for e in expenses {
        let total = spent.entry(e.category.as_str()).or_default();
        *total = total.saturating_add(e.amount);
    }
    spent
}

/// Computes spend-vs-budget for every budget, in budget order.
///
/// Expenses match a budget when their category is exactly equal (case-sensitive).
/// Expenses whose category has no budget are ignored.
#[must_use]
pub fn summarize_budgets(
    budgets: &[budget_entity::Model],
    expenses: &[expense_entity::Model],
) -> Vec<BudgetStatus> {
    let spent = spent_by_category(expenses);

    budgets
        .iter()
        .map(|b| {
            let spent = spent.get(b.category.as_str()).copied().unwrap_or_default();
            let remaining = b.amount.saturating_sub(spent);
            BudgetStatus {
                category: b.category.clone(),
                budget_amount: b.amount,
                spent,
                remaining,
                percent_used: calculate_percent(spent, b.amount),
                exceeded: remaining < Decimal::ZERO,
            }
        })
        .collect()
}

/// Average expense per distinct (year, month), rounded to a whole amount.
#[must_use]
pub fn monthly_average(expenses: &[expense_entity::Model]) -> Decimal {
    let months: HashSet<(i32, u32)> = expenses
        .iter()
        .map(|e| (e.date.year(), e.date.month()))
        .collect();
    if months.is_empty() {
        return Decimal::ZERO;
    }

    let total = saturating_sum(expenses.iter().map(|e| e.amount));
    (total / Decimal::from(months.len()))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the budget page totals.
#[must_use]
pub fn summarize_budget_totals(
    budgets: &[budget_entity::Model],
    expenses: &[expense_entity::Model],
) -> BudgetSummary {
    let statuses = summarize_budgets(budgets, expenses);
    let total_budget = saturating_sum(statuses.iter().map(|s| s.budget_amount));
    let total_spent = saturating_sum(statuses.iter().map(|s| s.spent));

    let mut recent_expenses = expenses.to_vec();
    recent_expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent_expenses.truncate(RECENT_EXPENSES);

    BudgetSummary {
        total_budget,
        total_spent,
        total_remaining: total_budget.saturating_sub(total_spent),
        percent_spent: calculate_percent(total_spent, total_budget),
        monthly_average_expense: monthly_average(expenses),
        recent_expenses,
    }
}

/// Sums amounts per category, keeping categories in order of first appearance.
#[must_use]
pub fn category_totals<'a, I>(records: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = (&'a str, Decimal)>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (category, amount) in records {
        if let Some(&i) = index.get(category) {
            totals[i].total = totals[i].total.saturating_add(amount);
        } else {
            index.insert(category, totals.len());
            totals.push(CategoryTotal {
                category: category.to_string(),
                total: amount,
            });
        }
    }
    totals
}

/// Builds the financial overview.
///
/// With `year` set, only records dated in that year count. Without it, the monthly
/// trend groups by month number across all years.
#[must_use]
pub fn build_overview(
    incomes: &[income_entity::Model],
    expenses: &[expense_entity::Model],
    year: Option<i32>,
) -> FinancialOverview {
    let in_period = |date: &chrono::NaiveDate| year.is_none_or(|y| date.year() == y);
    let incomes: Vec<&income_entity::Model> = incomes.iter().filter(|i| in_period(&i.date)).collect();
    let expenses: Vec<&expense_entity::Model> =
        expenses.iter().filter(|e| in_period(&e.date)).collect();

    let mut monthly: Vec<MonthlyTrend> = MONTH_LABELS
        .iter()
        .zip(1..)
        .map(|(&label, month)| MonthlyTrend {
            month,
            label,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            profit: Decimal::ZERO,
        })
        .collect();

    for i in &incomes {
        let month = &mut monthly[i.date.month0() as usize];
        month.income = month.income.saturating_add(i.amount);
    }
    for e in &expenses {
        let month = &mut monthly[e.date.month0() as usize];
        month.expense = month.expense.saturating_add(e.amount);
    }
    for m in &mut monthly {
        m.profit = m.income.saturating_sub(m.expense);
    }

    let total_revenue = saturating_sum(incomes.iter().map(|i| i.amount));
    let total_expense = saturating_sum(expenses.iter().map(|e| e.amount));

    FinancialOverview {
        year,
        total_revenue,
        total_expense,
        profit: total_revenue.saturating_sub(total_expense),
        monthly,
        income_by_category: category_totals(incomes.iter().map(|i| (i.category.as_str(), i.amount))),
        expense_by_category: category_totals(
            expenses.iter().map(|e| (e.category.as_str(), e.amount)),
        ),
    }
}

/// Fetches budgets and expenses and computes [`summarize_budgets`] over them.
pub async fn generate_budget_statuses(db: &DatabaseConnection) -> Result<Vec<BudgetStatus>> {
    let budgets = budget::get_all_budgets(db).await?;
    let expenses = expense::get_all_expenses(db).await?;
    Ok(summarize_budgets(&budgets, &expenses))
}

/// Fetches budgets and expenses and computes [`summarize_budget_totals`] over them.
pub async fn generate_budget_summary(db: &DatabaseConnection) -> Result<BudgetSummary> {
    let budgets = budget::get_all_budgets(db).await?;
    let expenses = expense::get_all_expenses(db).await?;
    Ok(summarize_budget_totals(&budgets, &expenses))
}

/// Fetches incomes and expenses and computes [`build_overview`] over them.
pub async fn generate_overview(
    db: &DatabaseConnection,
    year: Option<i32>,
) -> Result<FinancialOverview> {
    let incomes = income::list_incomes(db, &Default::default()).await?;
    let expenses = expense::get_all_expenses(db).await?;
    Ok(build_overview(&incomes, &expenses, year))
}
