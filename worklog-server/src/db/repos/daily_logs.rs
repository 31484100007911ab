//! Daily entry repository
//!
//! `entry` is stored and returned as ciphertext; callers own encryption.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use super::DbError;

/// Daily entry record (entry still encrypted)
#[derive(Debug, Clone, FromRow)]
pub struct DailyLog {
    pub id: i64,
    pub username: String,
    pub log_date: NaiveDate,
    pub entry: String,
    pub created_at: DateTime<Utc>,
}

/// Daily entry repository
pub struct DailyLogRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DailyLogRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        username: &str,
        log_date: NaiveDate,
        ciphertext: &str,
    ) -> Result<DailyLog, DbError> {
        let log = sqlx::query_as(
            r#"
            INSERT INTO daily_logs (username, log_date, entry)
            VALUES ($1, $2, $3)
            RETURNING id, username, log_date, entry, created_at
            "#,
        )
        .bind(username)
        .bind(log_date)
        .bind(ciphertext)
        .fetch_one(self.pool)
        .await?;

        Ok(log)
    }

    /// All of a user's entries, newest date first.
    pub async fn list_for_user(&self, username: &str) -> Result<Vec<DailyLog>, DbError> {
        let logs = sqlx::query_as(
            r#"
            SELECT id, username, log_date, entry, created_at
            FROM daily_logs
            WHERE username = $1
            ORDER BY log_date DESC, id DESC
            "#,
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }

    /// Entries with `start <= log_date <= end`, oldest first.
    pub async fn list_between(
        &self,
        username: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyLog>, DbError> {
        let logs = sqlx::query_as(
            r#"
            SELECT id, username, log_date, entry, created_at
            FROM daily_logs
            WHERE username = $1 AND log_date BETWEEN $2 AND $3
            ORDER BY log_date ASC, id ASC
            "#,
        )
        .bind(username)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;
    use crate::db::repos::{NewUser, UserRepo};
    use crate::models::{ContactDetails, Username};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    async fn user(pool: &PgPool) -> String {
        let username = Username::new(&test_support::unique_username("logs")).unwrap();
        UserRepo::new(pool)
            .create(NewUser {
                username: &username,
                password_hash: "x",
                contact: &ContactDetails::default(),
                is_admin: false,
            })
            .await
            .unwrap()
            .username
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn listing_orders_and_isolates_users() {
        let pool = test_support::pool().await;
        let alice = user(&pool).await;
        let bob = user(&pool).await;
        let repo = DailyLogRepo::new(&pool);

        repo.insert(&alice, date(4), "c1").await.unwrap();
        repo.insert(&alice, date(6), "c2").await.unwrap();
        repo.insert(&bob, date(5), "c3").await.unwrap();

        let logs = repo.list_for_user(&alice).await.unwrap();
        let dates: Vec<_> = logs.iter().map(|l| l.log_date).collect();
        assert_eq!(dates, vec![date(6), date(4)]);
        assert_eq!(repo.list_for_user(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn between_is_inclusive_and_ascending() {
        let pool = test_support::pool().await;
        let alice = user(&pool).await;
        let repo = DailyLogRepo::new(&pool);

        for d in [3, 4, 10, 11] {
            repo.insert(&alice, date(d), "c").await.unwrap();
        }

        let logs = repo.list_between(&alice, date(4), date(10)).await.unwrap();
        let dates: Vec<_> = logs.iter().map(|l| l.log_date).collect();
        assert_eq!(dates, vec![date(4), date(10)]);
    }
}
