//! Admin audit trail repository
//!
//! Append-only: rows are inserted and listed, never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};

use super::DbError;

/// Default number of audit rows shown on the audit page
const DEFAULT_LIST_LIMIT: i64 = 500;

/// Actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Deactivated,
    Reactivated,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deactivated => "deactivated user",
            Self::Reactivated => "reactivated user",
        }
    }
}

/// Audit record
#[derive(Debug, Clone, FromRow)]
pub struct AdminLog {
    pub id: i64,
    pub admin_username: String,
    pub action: String,
    pub target_user: String,
    pub timestamp: DateTime<Utc>,
}

/// Audit trail repository
pub struct AdminLogRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminLogRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a row using any executor, so callers can include it in a transaction.
    pub async fn record_with<'e, E>(
        executor: E,
        admin: &str,
        action: AdminAction,
        target: &str,
    ) -> Result<AdminLog, DbError>
    where
        E: PgExecutor<'e>,
    {
        let log: AdminLog = sqlx::query_as(
            r#"
            INSERT INTO admin_logs (admin_username, action, target_user)
            VALUES ($1, $2, $3)
            RETURNING id, admin_username, action, target_user, timestamp
            "#,
        )
        .bind(admin)
        .bind(action.as_str())
        .bind(target)
        .fetch_one(executor)
        .await?;

        Ok(log)
    }

    /// Most recent entries first.
    pub async fn list(&self) -> Result<Vec<AdminLog>, DbError> {
        let logs = sqlx::query_as(
            r#"
            SELECT id, admin_username, action, target_user, timestamp
            FROM admin_logs
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(DEFAULT_LIST_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }
}
