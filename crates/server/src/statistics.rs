//! Statistics API endpoints

use api_types::stats::{
    AccountCategorySummary, BudgetStatus, DepartmentSummary, MonthlyPoint, Summary, Trend,
};
use axum::{Json, extract::State};
use engine::ExecutionTrend;

use crate::{ServerError, extract::BudgetFilter, server::ServerState};

fn trend(trend: ExecutionTrend) -> Trend {
    match trend {
        ExecutionTrend::High => Trend::High,
        ExecutionTrend::Normal => Trend::Normal,
        ExecutionTrend::Low => Trend::Low,
    }
}

fn summary_view(s: engine::Summary) -> Summary {
    Summary {
        total_budget: s.total_budget,
        settled_budget: s.settled_budget,
        total_actual: s.total_actual,
        execution_rate: s.execution_rate,
        projected_annual: s.projected_annual,
        remaining_budget: s.remaining_budget,
        settlement_month: s.settlement_month,
        trend: trend(s.trend),
        budget_status: match s.budget_status {
            engine::BudgetStatus::WithinBudget => BudgetStatus::WithinBudget,
            engine::BudgetStatus::OverrunExpected => BudgetStatus::OverrunExpected,
        },
    }
}

/// Headline figures over the whole store. Filters do not apply here.
pub async fn summary(State(state): State<ServerState>) -> Json<Summary> {
    Json(summary_view(state.engine.summary()))
}

/// Headline figures over the entries matching the filter parameters.
pub async fn summary_filtered(
    State(state): State<ServerState>,
    BudgetFilter(filter): BudgetFilter,
) -> Result<Json<Summary>, ServerError> {
    let summary = state.engine.summary_filtered(filter)?;
    Ok(Json(summary_view(summary)))
}

pub async fn departments(
    State(state): State<ServerState>,
    BudgetFilter(filter): BudgetFilter,
) -> Result<Json<Vec<DepartmentSummary>>, ServerError> {
    let groups = state.engine.department_totals(filter)?;
    Ok(Json(
        groups
            .into_iter()
            .map(|g| DepartmentSummary {
                department: g.department.to_string(),
                total_budget: g.totals.budget,
                total_actual: g.totals.actual,
                execution_rate: g.execution_rate,
                projected_annual: g.projected_annual,
            })
            .collect(),
    ))
}

pub async fn categories(
    State(state): State<ServerState>,
    BudgetFilter(filter): BudgetFilter,
) -> Result<Json<Vec<AccountCategorySummary>>, ServerError> {
    let groups = state.engine.category_totals(filter)?;
    Ok(Json(
        groups
            .into_iter()
            .map(|g| AccountCategorySummary {
                account_category: g.account_category.to_string(),
                total_budget: g.totals.budget,
                total_actual: g.totals.actual,
                execution_rate: g.execution_rate,
            })
            .collect(),
    ))
}

pub async fn monthly(
    State(state): State<ServerState>,
    BudgetFilter(filter): BudgetFilter,
) -> Result<Json<Vec<MonthlyPoint>>, ServerError> {
    let series = state.engine.monthly_series(filter)?;
    Ok(Json(
        series
            .into_iter()
            .map(|p| MonthlyPoint {
                month: p.month,
                execution_rate: p.execution_rate,
                target_rate: p.target_rate,
                is_projected: p.is_projected,
            })
            .collect(),
    ))
}
