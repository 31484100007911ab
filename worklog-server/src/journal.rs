//! Journal operations shared by the web routes and the CLI
//!
//! Everything that touches plaintext lives here: entries and summaries are
//! encrypted before they reach a repository and decrypted on the way out.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::crypto::{CipherError, FieldCipher};
use crate::db::{DailyLog, DailyLogRepo, DbError, SummaryRepo, UserRepo, WeeklySummary};
use crate::models::{EntryText, SummaryText, ValidationError, Week};
use crate::summarizer::{build_log_text, Summarizer, SummarizerError};

pub const ENTRY_PLACEHOLDER: &str = "[Error decrypting entry]";
pub const SUMMARY_PLACEHOLDER: &str = "[Error decrypting summary]";
pub const ADMIN_ENTRY_PLACEHOLDER: &str = "[Error decrypting log]";

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("encryption error: {0}")]
    Cipher(#[from] CipherError),

    #[error("summarizer error: {0}")]
    Summarizer(#[from] SummarizerError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A daily entry ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub log_date: NaiveDate,
    pub text: String,
}

/// A weekly summary ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub text: String,
}

/// Outcome of a scheduled aggregation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SummaryRun {
    pub written: usize,
    pub without_entries: usize,
    pub failed: usize,
}

/// Journal operations for one cipher key
pub struct Journal<'a> {
    pool: &'a PgPool,
    cipher: &'a FieldCipher,
}

impl<'a> Journal<'a> {
    pub fn new(pool: &'a PgPool, cipher: &'a FieldCipher) -> Self {
        Self { pool, cipher }
    }

    pub async fn record_entry(
        &self,
        username: &str,
        log_date: NaiveDate,
        entry: &EntryText,
    ) -> Result<DailyLog, JournalError> {
        let ciphertext = self.cipher.encrypt(entry.as_str())?;
        let log = DailyLogRepo::new(self.pool)
            .insert(username, log_date, &ciphertext)
            .await?;
        tracing::info!(user = %username, date = %log_date, "recorded daily entry");
        Ok(log)
    }

    /// A user's entries, newest first, with undecryptable ones replaced by `placeholder`.
    pub async fn entries(
        &self,
        username: &str,
        placeholder: &str,
    ) -> Result<Vec<EntryView>, JournalError> {
        let logs = DailyLogRepo::new(self.pool).list_for_user(username).await?;
        Ok(logs
            .into_iter()
            .map(|log| EntryView {
                log_date: log.log_date,
                text: self.cipher.decrypt_or_placeholder(&log.entry, placeholder),
            })
            .collect())
    }

    pub async fn summaries(&self, username: &str) -> Result<Vec<SummaryView>, JournalError> {
        let rows = SummaryRepo::new(self.pool).list_for_user(username).await?;
        Ok(rows
            .into_iter()
            .map(|row| SummaryView {
                week_start: row.week_start,
                week_end: row.week_end,
                text: self
                    .cipher
                    .decrypt_or_placeholder(&row.summary, SUMMARY_PLACEHOLDER),
            })
            .collect())
    }

    /// Store a summary the user wrote themselves.
    pub async fn submit_summary(
        &self,
        username: &str,
        week: Week,
        summary: &SummaryText,
    ) -> Result<WeeklySummary, JournalError> {
        let ciphertext = self.cipher.encrypt(summary.as_str())?;
        let row = SummaryRepo::new(self.pool)
            .insert(username, week, &ciphertext)
            .await?;
        tracing::info!(user = %username, week_start = %week.start(), "stored submitted summary");
        Ok(row)
    }

    /// Summarize the week containing `today` for one user.
    ///
    /// Returns `Ok(None)` when the user has no readable entries that week.
    pub async fn generate_weekly_summary(
        &self,
        summarizer: &dyn Summarizer,
        username: &str,
        today: NaiveDate,
    ) -> Result<Option<WeeklySummary>, JournalError> {
        let week = Week::containing(today)?;
        let logs = DailyLogRepo::new(self.pool)
            .list_between(username, week.start(), week.end())
            .await?;

        let Some(log_text) = week_log_text(self.cipher, &logs) else {
            tracing::info!(user = %username, week_start = %week.start(), "no entries to summarize");
            return Ok(None);
        };

        let summary = summarizer.summarize(&log_text).await?;
        let ciphertext = self.cipher.encrypt(&summary)?;
        let row = SummaryRepo::new(self.pool)
            .insert(username, week, &ciphertext)
            .await?;

        tracing::info!(
            user = %username,
            week_start = %week.start(),
            entries = logs.len(),
            "stored generated summary"
        );
        Ok(Some(row))
    }

    /// Scheduled aggregation: summarize the week for every active user.
    ///
    /// A failure for one user is logged and counted; the run continues.
    pub async fn summarize_all_users(
        &self,
        summarizer: &dyn Summarizer,
        today: NaiveDate,
    ) -> Result<SummaryRun, JournalError> {
        let usernames = UserRepo::new(self.pool).list_active_usernames().await?;
        let mut run = SummaryRun::default();

        for username in usernames {
            match self
                .generate_weekly_summary(summarizer, &username, today)
                .await
            {
                Ok(Some(_)) => run.written += 1,
                Ok(None) => run.without_entries += 1,
                Err(err) => {
                    tracing::error!(user = %username, error = %err, "weekly summary failed");
                    run.failed += 1;
                }
            }
        }

        Ok(run)
    }
}

/// Decrypt a week's entries into summarizer input.
///
/// Entries that fail to decrypt are skipped; `None` if nothing is left.
pub fn week_log_text(cipher: &FieldCipher, logs: &[DailyLog]) -> Option<String> {
    let decrypted: Vec<(NaiveDate, String)> = logs
        .iter()
        .filter_map(|log| match cipher.decrypt(&log.entry) {
            Ok(text) => Some((log.log_date, text)),
            Err(err) => {
                tracing::warn!(id = log.id, error = %err, "skipping undecryptable entry");
                None
            }
        })
        .collect();

    if decrypted.is_empty() {
        return None;
    }

    Some(build_log_text(
        decrypted.iter().map(|(date, text)| (*date, text.as_str())),
    ))
}
