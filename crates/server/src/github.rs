//! GitHub pass-through endpoints.
//!
//! A thin client over the GitHub REST API. Nothing here touches the budget
//! store; upstream failures surface as [`ServerError::Upstream`].

use api_types::github::{Repository, RepositoryCreated, RepositoryNew, User};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ServerError, server::ServerState};

const NOT_CONFIGURED: &str = "GitHub integration is not configured";

#[derive(Clone, Debug)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct GhUser {
    login: String,
    name: Option<String>,
    avatar_url: String,
}

#[derive(Debug, Deserialize)]
struct GhRepository {
    name: String,
    full_name: String,
    html_url: String,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    clone_url: String,
}

#[derive(Debug, Serialize)]
struct GhRepositoryNew<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
}

impl GithubClient {
    pub fn new(base_url: String, token: String) -> Result<Self, GithubError> {
        let client = Client::builder()
            .user_agent(concat!("budget-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<TResp: for<'de> Deserialize<'de>>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<TResp, GithubError> {
        let resp = req
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<TResp>().await?);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.message,
            Err(_) => "upstream error".to_string(),
        };
        Err(GithubError::Server { status, message })
    }

    async fn authenticated_user(&self) -> Result<GhUser, GithubError> {
        self.send(self.client.get(self.url("/user"))).await
    }

    async fn repositories(&self) -> Result<Vec<GhRepository>, GithubError> {
        self.send(
            self.client
                .get(self.url("/user/repos"))
                .query(&[("sort", "updated"), ("per_page", "100")]),
        )
        .await
    }

    async fn create_repository(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<GhRepository, GithubError> {
        let body = GhRepositoryNew {
            name,
            description,
            private,
        };
        self.send(self.client.post(self.url("/user/repos")).json(&body))
            .await
    }
}

fn client<'a>(state: &'a ServerState, error: &str) -> Result<&'a GithubClient, ServerError> {
    state.github.as_ref().ok_or_else(|| ServerError::Upstream {
        error: error.to_string(),
        message: NOT_CONFIGURED.to_string(),
    })
}

fn upstream(error: &str) -> impl FnOnce(GithubError) -> ServerError + '_ {
    move |err| ServerError::Upstream {
        error: error.to_string(),
        message: err.to_string(),
    }
}

pub async fn user(State(state): State<ServerState>) -> Result<Json<User>, ServerError> {
    const ERROR: &str = "Failed to get GitHub user";
    let user = client(&state, ERROR)?
        .authenticated_user()
        .await
        .map_err(upstream(ERROR))?;

    Ok(Json(User {
        login: user.login,
        name: user.name,
        avatar_url: user.avatar_url,
    }))
}

pub async fn repositories(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Repository>>, ServerError> {
    const ERROR: &str = "Failed to list repositories";
    let repos = client(&state, ERROR)?
        .repositories()
        .await
        .map_err(upstream(ERROR))?;

    Ok(Json(
        repos
            .into_iter()
            .map(|r| Repository {
                name: r.name,
                full_name: r.full_name,
                html_url: r.html_url,
                private: r.private,
            })
            .collect(),
    ))
}

pub async fn repository_new(
    State(state): State<ServerState>,
    payload: Result<Json<RepositoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<RepositoryCreated>), ServerError> {
    const ERROR: &str = "Failed to create repository";
    let Json(payload) = payload?;
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ServerError::Generic(
            "Repository name is required".to_string(),
        ));
    }

    let repo = client(&state, ERROR)?
        .create_repository(
            name,
            payload.description.as_deref().unwrap_or_default(),
            payload.is_private.unwrap_or(false),
        )
        .await
        .map_err(upstream(ERROR))?;
    tracing::info!("created repository {}", repo.full_name);

    Ok((
        StatusCode::CREATED,
        Json(RepositoryCreated {
            name: repo.name,
            full_name: repo.full_name,
            html_url: repo.html_url,
            clone_url: repo.clone_url,
        }),
    ))
}
