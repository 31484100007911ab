//! Weekly summary job
//!
//! Meant for a scheduler (cron, systemd timer) running once a week. Without
//! `--user` every active account is summarized; failures for one user are
//! logged and the run continues.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use worklog_server::models::Week;
use worklog_server::summarizer::OpenAiSummarizer;
use worklog_server::Journal;

use super::{connect, load_config};

/// Arguments for the summarize command
#[derive(Parser, Debug)]
pub struct SummarizeArgs {
    /// Only summarize this user
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Any date in the week to summarize, YYYY-MM-DD (default: today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Database URL (overrides environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let day = args.date.unwrap_or_else(|| Local::now().date_naive());
    let week = Week::containing(day).context("Cannot summarize that week")?;

    let config = load_config(args.database_url)?;
    let Some(openai) = config.openai.clone() else {
        bail!("OPENAI_API_KEY is not set; cannot generate summaries");
    };
    let summarizer = OpenAiSummarizer::new(openai).context("Failed to build summarizer client")?;

    let pool = connect(&config.database_url).await?;
    let cipher = config.cipher()?;
    let journal = Journal::new(&pool, &cipher);

    match args.user {
        Some(user) => {
            let generated = journal
                .generate_weekly_summary(&summarizer, &user, day)
                .await
                .with_context(|| format!("Failed to summarize week for {}", user))?;
            match generated {
                Some(_) => println!("Stored summary for {} ({} to {})", user, week.start(), week.end()),
                None => println!("{} has no entries between {} and {}", user, week.start(), week.end()),
            }
        }
        None => {
            let run = journal
                .summarize_all_users(&summarizer, day)
                .await
                .context("Failed to list users")?;
            println!(
                "Week {} to {}: {} written, {} without entries, {} failed",
                week.start(),
                week.end(),
                run.written,
                run.without_entries,
                run.failed
            );
            if run.failed > 0 {
                bail!("{} summaries failed", run.failed);
            }
        }
    }

    Ok(())
}
