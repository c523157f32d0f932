mod error;
mod settings;

use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_dashboard={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let mut builder = engine::Engine::builder().settlement_month(settings.budget.settlement_month);
    if settings.budget.seed {
        builder = builder.seed(settings.budget.seed_year);
    }
    let engine = builder.build()?;
    tracing::info!(
        "engine ready, settlement month {}",
        engine.settlement_month()
    );

    let github = match settings.github.token {
        Some(token) if !token.trim().is_empty() => {
            tracing::info!("GitHub integration enabled");
            Some(server::GithubClient::new(settings.github.api_url, token)?)
        }
        _ => {
            tracing::info!("no GitHub token configured, GitHub endpoints disabled");
            None
        }
    };

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(server::ServerState::new(engine, github), listener).await?;

    Ok(())
}
