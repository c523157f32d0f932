//! Extractors for budget requests.
//!
//! Bodies and query strings are decoded one field at a time: a value of the
//! wrong shape becomes an issue on that field and is reported together with
//! the engine's range checks, instead of failing the whole request. A JSON
//! `null` counts as an absent field.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use axum_extra::extract::Query;
use engine::{EngineError, EntryInput, FieldIssue, FilterInput};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ServerError;

/// Entry fields from a JSON object body.
#[derive(Debug)]
pub struct EntryBody(pub EntryInput);

impl<S: Send + Sync> FromRequest<S> for EntryBody {
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;
        let Value::Object(body) = body else {
            return Err(ServerError::Generic(
                "Request body must be a JSON object".to_string(),
            ));
        };
        Ok(EntryBody(entry_input(&body)))
    }
}

fn present<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| !value.is_null())
}

fn text(
    body: &Map<String, Value>,
    field: &str,
    rejected: &mut Vec<FieldIssue>,
) -> Option<String> {
    match present(body, field)? {
        Value::String(value) => Some(value.clone()),
        _ => {
            rejected.push(FieldIssue::new(field, "expected a string"));
            None
        }
    }
}

fn number(
    body: &Map<String, Value>,
    field: &str,
    rejected: &mut Vec<FieldIssue>,
) -> Option<f64> {
    match present(body, field)?.as_f64() {
        Some(value) => Some(value),
        None => {
            rejected.push(FieldIssue::new(field, "expected a number"));
            None
        }
    }
}

/// A number without a fractional part; `5.0` is accepted as `5`.
fn whole(
    body: &Map<String, Value>,
    field: &str,
    rejected: &mut Vec<FieldIssue>,
) -> Option<i64> {
    let value = present(body, field)?;
    if let Some(value) = value.as_i64() {
        return Some(value);
    }
    match value.as_f64() {
        // Out-of-range magnitudes saturate and fail the engine's range check.
        Some(value) if value.fract() == 0.0 => Some(value as i64),
        _ => {
            rejected.push(FieldIssue::new(field, "expected a whole number"));
            None
        }
    }
}

pub(crate) fn entry_input(body: &Map<String, Value>) -> EntryInput {
    let mut rejected = Vec::new();
    EntryInput {
        department: text(body, "department", &mut rejected),
        account_category: text(body, "accountCategory", &mut rejected),
        month: whole(body, "month", &mut rejected),
        year: whole(body, "year", &mut rejected),
        budget_amount: number(body, "budgetAmount", &mut rejected),
        actual_amount: number(body, "actualAmount", &mut rejected),
        rejected,
    }
}

/// Every parameter as a list, so a repeated key never fails decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFilter {
    start_month: Vec<String>,
    end_month: Vec<String>,
    year: Vec<String>,
    departments: Vec<String>,
    account_categories: Vec<String>,
}

fn single(field: &str, values: Vec<String>, rejected: &mut Vec<FieldIssue>) -> Option<String> {
    if values.len() > 1 {
        rejected.push(FieldIssue::new(field, "given more than once"));
        return None;
    }
    values.into_iter().next()
}

impl From<RawFilter> for FilterInput {
    fn from(raw: RawFilter) -> Self {
        let mut rejected = Vec::new();
        FilterInput {
            start_month: single("startMonth", raw.start_month, &mut rejected),
            end_month: single("endMonth", raw.end_month, &mut rejected),
            year: single("year", raw.year, &mut rejected),
            departments: raw.departments,
            account_categories: raw.account_categories,
            rejected,
        }
    }
}

/// Filter parameters of the listing, chart and export endpoints.
///
/// `departments` and `accountCategories` may be repeated; the other keys
/// may appear once.
#[derive(Debug)]
pub struct BudgetFilter(pub FilterInput);

impl<S: Send + Sync> FromRequestParts<S> for BudgetFilter {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawFilter>::from_request_parts(parts, state)
            .await
            .map_err(|err| {
                let issue = FieldIssue::new("query", err.to_string());
                ServerError::Engine(EngineError::Validation(vec![issue]))
            })?;
        Ok(BudgetFilter(raw.into()))
    }
}
