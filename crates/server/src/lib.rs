use api_types::error::{ErrorBody, FieldDetail};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;

pub use github::{GithubClient, GithubError};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod budget;
mod exports;
mod extract;
mod github;
mod server;
mod statistics;

pub mod types {
    pub mod budget {
        pub use api_types::budget::{BudgetEntry, BudgetEntryNew, BudgetEntryUpdate, Labels};
    }

    pub mod stats {
        pub use api_types::stats::{
            AccountCategorySummary, BudgetStatus, DepartmentSummary, MonthlyPoint, Summary, Trend,
        };
    }

    pub mod export {
        pub use api_types::export::JsonExport;
    }

    pub mod github {
        pub use api_types::github::{Repository, RepositoryCreated, RepositoryNew, User};
    }

    pub mod error {
        pub use api_types::error::{ErrorBody, FieldDetail};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    /// A call to an external service failed.
    Upstream { error: String, message: String },
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidSettings(_) | EngineError::Export(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    let (error, details) = match err {
        EngineError::Validation(issues) => {
            let details = issues
                .into_iter()
                .map(|issue| FieldDetail {
                    field: issue.field,
                    message: issue.message,
                })
                .collect();
            ("Invalid budget entry data".to_string(), Some(details))
        }
        EngineError::KeyNotFound(_) => ("Budget entry not found".to_string(), None),
        other => {
            tracing::error!("internal error: {other}");
            ("internal server error".to_string(), None)
        }
    };

    ErrorBody {
        error,
        details,
        message: None,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    details: None,
                    message: None,
                },
            ),
            ServerError::Upstream { error, message } => {
                tracing::warn!("{error}: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error,
                        details: None,
                        message: Some(message),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
