//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;
use worklog_server::config::load_dotenv;
use worklog_server::db::migrations;

use super::connect;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Apply the schema. Safe to run repeatedly.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    load_dotenv();
    // Only the database is needed here, so fall back to the full config
    // only when no URL was given.
    let database_url = match args.database_url.or_else(|| std::env::var("DATABASE_URL").ok()) {
        Some(url) => url,
        None => super::load_config(None)?.database_url,
    };

    let pool = connect(&database_url).await?;
    migrations::run(&pool)
        .await
        .context("Failed to apply schema")?;

    tracing::info!("Schema is up to date");
    Ok(())
}
