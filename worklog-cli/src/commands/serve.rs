//! HTTP server command
//!
//! Applies the schema, then serves until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use worklog_server::db::migrations;
use worklog_server::http::{run_server, ServerConfig};
use worklog_server::AppState;

use super::{connect, load_config};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "WORKLOG_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = load_config(args.database_url)?;
    tracing::debug!(?config, "loaded configuration");

    let pool = connect(&config.database_url).await?;
    migrations::run(&pool)
        .await
        .context("Failed to apply schema")?;

    let state = AppState::from_config(pool, &config).context("Failed to initialise server state")?;
    let server_config = ServerConfig {
        bind_addr: args.bind,
        static_dir: config.static_dir.clone(),
    };

    tracing::info!("Starting worklog server on {}", args.bind);
    run_server(state, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
