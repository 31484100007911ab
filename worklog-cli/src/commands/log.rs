//! Record a daily entry from the terminal

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tokio::io::AsyncReadExt;
use worklog_server::db::UserRepo;
use worklog_server::models::EntryText;
use worklog_server::Journal;

use super::{connect, load_config};

/// Arguments for the log command
#[derive(Parser, Debug)]
pub struct LogArgs {
    /// Username the entry belongs to
    #[arg(long, short = 'u')]
    pub user: String,

    /// Entry date, YYYY-MM-DD (default: today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Entry text (read from stdin when omitted)
    pub text: Option<String>,

    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read entry from stdin")?;
    Ok(text)
}

pub async fn run_log(args: LogArgs) -> Result<()> {
    let config = load_config(args.database_url)?;

    let text = match args.text {
        Some(text) => text,
        None => read_stdin().await?,
    };
    let entry = EntryText::new(&text).context("Invalid entry")?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let pool = connect(&config.database_url).await?;
    let Some(user) = UserRepo::new(&pool)
        .find(&args.user)
        .await
        .context("Failed to look up user")?
    else {
        bail!("No such user: {}", args.user);
    };
    if !user.is_active {
        bail!("User {} is deactivated", user.username);
    }

    let cipher = config.cipher()?;
    let log = Journal::new(&pool, &cipher)
        .record_entry(&user.username, date, &entry)
        .await
        .context("Failed to record entry")?;

    println!("Recorded entry {} for {} on {}", log.id, log.username, log.log_date);
    Ok(())
}
