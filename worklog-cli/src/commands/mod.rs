//! Command implementations for the worklog CLI

pub mod keygen;
pub mod log;
pub mod migrate;
pub mod serve;
pub mod summarize;

use anyhow::{Context, Result};
use worklog_server::config::load_dotenv;
use worklog_server::db::{create_pool, PgPool};
use worklog_server::AppConfig;

pub use keygen::{run_keygen, KeygenArgs};
pub use log::{run_log, LogArgs};
pub use migrate::{run_migrate, MigrateArgs};
pub use serve::{run_serve, ServeArgs};
pub use summarize::{run_summarize, SummarizeArgs};

/// Load `.env` and the environment, with an optional database URL override.
pub(crate) fn load_config(database_url: Option<String>) -> Result<AppConfig> {
    load_dotenv();
    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = database_url {
        config.database_url = url;
    }
    Ok(config)
}

pub(crate) async fn connect(database_url: &str) -> Result<PgPool> {
    create_pool(database_url)
        .await
        .context("Failed to create database pool")
}
