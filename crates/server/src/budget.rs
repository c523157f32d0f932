//! Budget entry API endpoints.

use api_types::budget::{BudgetEntry, Labels};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{AccountCategory, Department};

use crate::{
    ServerError,
    extract::{BudgetFilter, EntryBody},
    server::ServerState,
};

pub(crate) fn entry_view(entry: engine::BudgetEntry) -> BudgetEntry {
    BudgetEntry {
        id: entry.id,
        department: entry.department.to_string(),
        account_category: entry.account_category.to_string(),
        month: entry.month,
        year: entry.year,
        budget_amount: entry.budget_amount,
        actual_amount: entry.actual_amount,
        execution_rate: entry.execution_rate,
    }
}

/// List the entries matching the filter parameters.
pub async fn list(
    State(state): State<ServerState>,
    BudgetFilter(filter): BudgetFilter,
) -> Result<Json<Vec<BudgetEntry>>, ServerError> {
    let entries = state.engine.entries(filter)?;
    Ok(Json(entries.into_iter().map(entry_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<BudgetEntry>, ServerError> {
    let entry = state.engine.entry(&id)?;
    Ok(Json(entry_view(entry)))
}

pub async fn create(
    State(state): State<ServerState>,
    EntryBody(input): EntryBody,
) -> Result<(StatusCode, Json<BudgetEntry>), ServerError> {
    let entry = state.engine.create_entry(input)?;
    tracing::info!("created budget entry {}", entry.id);

    Ok((StatusCode::CREATED, Json(entry_view(entry))))
}

/// Apply a partial update. Fields left out of the body keep their value.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    EntryBody(input): EntryBody,
) -> Result<Json<BudgetEntry>, ServerError> {
    let entry = state.engine.update_entry(&id, input)?;

    Ok(Json(entry_view(entry)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_entry(&id)?;
    tracing::info!("deleted budget entry {id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn labels() -> Json<Labels> {
    Json(labels_view())
}

pub(crate) fn labels_view() -> Labels {
    Labels {
        departments: Department::labels().into_iter().map(String::from).collect(),
        account_categories: AccountCategory::labels()
            .into_iter()
            .map(String::from)
            .collect(),
    }
}
