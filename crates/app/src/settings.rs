//! Settings for the application.
//!
//! Sources, lowest to highest precedence: built-in defaults, the TOML file
//! (`config/budget.toml` unless `--config` says otherwise), `BUDGET_*`
//! environment variables (`BUDGET_SERVER__PORT=8080`) and the command line.
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/budget.toml";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Budget {
    /// Last month whose actuals are settled.
    pub settlement_month: u8,
    /// Fill the store with synthetic entries on startup.
    pub seed: bool,
    pub seed_year: i32,
}

#[derive(Debug, Deserialize)]
pub struct Github {
    pub token: Option<String>,
    pub api_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub budget: Budget,
    pub github: Github,
}

#[derive(Debug, Parser)]
#[command(name = "budget_dashboard", version)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the bind address.
    #[arg(long)]
    bind: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long)]
    level: Option<String>,
    /// Override the settlement month (0-12).
    #[arg(long)]
    settlement_month: Option<u8>,
}

impl Settings {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    fn from_args(args: Args) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default(
                "budget.settlement_month",
                i64::from(engine::DEFAULT_SETTLEMENT_MONTH),
            )?
            .set_default("budget.seed", true)?
            .set_default("budget.seed_year", 2025)?
            .set_default("github.api_url", "https://api.github.com")?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("BUDGET")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.bind", args.bind)?
            .set_override_option("server.port", args.port.map(i64::from))?
            .set_override_option("app.level", args.level)?
            .set_override_option(
                "budget.settlement_month",
                args.settlement_month.map(i64::from),
            )?
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
