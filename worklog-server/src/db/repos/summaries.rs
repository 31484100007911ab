//! Weekly summary repository

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::Week;

/// Weekly summary record (summary still encrypted)
#[derive(Debug, Clone, FromRow)]
pub struct WeeklySummary {
    pub id: i64,
    pub username: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// Weekly summary repository
pub struct SummaryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SummaryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        username: &str,
        week: Week,
        ciphertext: &str,
    ) -> Result<WeeklySummary, DbError> {
        let summary = sqlx::query_as(
            r#"
            INSERT INTO weekly_summaries (username, week_start, week_end, summary)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, week_start, week_end, summary, created_at
            "#,
        )
        .bind(username)
        .bind(week.start())
        .bind(week.end())
        .bind(ciphertext)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// A user's summaries, newest week first.
    pub async fn list_for_user(&self, username: &str) -> Result<Vec<WeeklySummary>, DbError> {
        let summaries = sqlx::query_as(
            r#"
            SELECT id, username, week_start, week_end, summary, created_at
            FROM weekly_summaries
            WHERE username = $1
            ORDER BY week_start DESC, id DESC
            "#,
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }
}
