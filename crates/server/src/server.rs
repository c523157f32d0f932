use axum::{Router, routing::get};

use std::sync::Arc;

use crate::{budget, exports, github, github::GithubClient, statistics};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// `None` when no GitHub token is configured.
    pub github: Option<GithubClient>,
}

impl ServerState {
    pub fn new(engine: Engine, github: Option<GithubClient>) -> Self {
        Self {
            engine: Arc::new(engine),
            github,
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/budget", get(budget::list).post(budget::create))
        .route("/budget/labels", get(budget::labels))
        .route("/budget/summary/stats", get(statistics::summary))
        .route("/budget/summary/filtered", get(statistics::summary_filtered))
        .route("/budget/summary/departments", get(statistics::departments))
        .route("/budget/summary/categories", get(statistics::categories))
        .route("/budget/summary/monthly", get(statistics::monthly))
        .route("/budget/export/json", get(exports::json))
        .route("/budget/export/csv", get(exports::csv))
        .route("/budget/export/filtered/csv", get(exports::filtered_csv))
        .route("/budget/template/csv", get(exports::template_csv))
        .route(
            "/budget/{id}",
            get(budget::get)
                .patch(budget::update)
                .delete(budget::delete),
        )
        .route("/github/user", get(github::user))
        .route(
            "/github/repos",
            get(github::repositories).post(github::repository_new),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
