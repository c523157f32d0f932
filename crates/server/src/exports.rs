//! Download endpoints. Every payload carries a dated filename hint.

use api_types::export::JsonExport;
use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    ServerError,
    budget::{entry_view, labels_view},
    extract::BudgetFilter,
    server::ServerState,
};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn dated_filename(prefix: &str, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", Utc::now().format("%Y-%m-%d"))
}

fn attachment(content_type: &str, filename: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn json(State(state): State<ServerState>) -> Response {
    let labels = labels_view();
    let export = JsonExport {
        export_date: Utc::now(),
        settlement_month: state.engine.settlement_month(),
        departments: labels.departments,
        account_categories: labels.account_categories,
        data: state
            .engine
            .all_entries()
            .into_iter()
            .map(entry_view)
            .collect(),
    };
    tracing::debug!("exporting {} entries as json", export.data.len());

    attachment(
        "application/json",
        &dated_filename("budget_data", "json"),
        Json(export),
    )
}

pub async fn csv(State(state): State<ServerState>) -> Result<Response, ServerError> {
    let body = state.engine.export_csv()?;
    Ok(attachment(
        CSV_CONTENT_TYPE,
        &dated_filename("budget_data", "csv"),
        body,
    ))
}

/// The dashboard table as shown, without ids.
pub async fn filtered_csv(
    State(state): State<ServerState>,
    BudgetFilter(filter): BudgetFilter,
) -> Result<Response, ServerError> {
    let body = state.engine.export_filtered_csv(filter)?;
    Ok(attachment(
        CSV_CONTENT_TYPE,
        &dated_filename("budget_filtered", "csv"),
        body,
    ))
}

pub async fn template_csv(State(state): State<ServerState>) -> Result<Response, ServerError> {
    let body = state.engine.template_csv()?;
    Ok(attachment(
        CSV_CONTENT_TYPE,
        &dated_filename("budget_template", "csv"),
        body,
    ))
}
