//! worklog CLI - run the journal server and its maintenance jobs
//!
//! Subcommands:
//! - `serve`: HTTP server (applies the schema first)
//! - `migrate`: apply the schema and exit
//! - `log`: record a daily entry from the terminal
//! - `summarize`: weekly summary job for one or all users
//! - `keygen`: print a fresh encryption key

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{KeygenArgs, LogArgs, MigrateArgs, ServeArgs, SummarizeArgs};
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "worklog",
    author,
    version,
    about = "Private work journal with encrypted entries and weekly summaries",
    long_about = "Record short daily work entries, stored encrypted, and turn each week of \
                  entries into a summary. Configuration comes from the environment or a .env file."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve(ServeArgs),

    /// Create or update the database schema
    Migrate(MigrateArgs),

    /// Record a daily entry for a user
    Log(LogArgs),

    /// Generate weekly summaries (one user, or every active user)
    Summarize(SummarizeArgs),

    /// Print a new ENCRYPTION_KEY value
    Keygen(KeygenArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::Log(args) => commands::run_log(args).await?,
        Commands::Summarize(args) => commands::run_summarize(args).await?,
        Commands::Keygen(args) => commands::run_keygen(args),
    }

    Ok(())
}
