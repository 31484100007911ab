//! User repository
//!
//! Users are never deleted; admins toggle `is_active` instead.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{AdminAction, AdminLogRepo, DbError};
use crate::models::{ContactDetails, Username};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// User row for the admin dashboard, with entry count
#[derive(Debug, Clone, FromRow)]
pub struct UserOverview {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub log_count: i64,
}

/// Insert payload for a new account
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a Username,
    pub password_hash: &'a str,
    pub contact: &'a ContactDetails,
    pub is_admin: bool,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as(
            r#"
            SELECT username, password_hash, first_name, last_name, email, phone_number,
                   is_admin, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a new user.
    ///
    /// The primary key decides duplicates; a taken username is `DbError::Conflict`.
    pub async fn create(&self, new: NewUser<'_>) -> Result<User, DbError> {
        let result = sqlx::query_as(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, email,
                               phone_number, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING username, password_hash, first_name, last_name, email, phone_number,
                      is_admin, is_active, created_at
            "#,
        )
        .bind(new.username.as_str())
        .bind(new.password_hash)
        .bind(new.contact.first_name.as_deref())
        .bind(new.contact.last_name.as_deref())
        .bind(new.contact.email.as_deref())
        .bind(new.contact.phone_number.as_deref())
        .bind(new.is_admin)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DbError::Conflict {
                resource: "user",
                id: new.username.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// All users with their entry counts, alphabetical.
    ///
    /// LEFT JOIN keeps users with no entries (count 0).
    pub async fn list_with_log_counts(&self) -> Result<Vec<UserOverview>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT
                u.username,
                u.first_name,
                u.last_name,
                u.email,
                u.phone_number,
                u.is_admin,
                u.is_active,
                COUNT(d.id) AS log_count
            FROM users u
            LEFT JOIN daily_logs d ON d.username = u.username
            GROUP BY u.username
            ORDER BY u.username
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Usernames of every active account, for the scheduled summary job.
    pub async fn list_active_usernames(&self) -> Result<Vec<String>, DbError> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT username FROM users WHERE is_active ORDER BY username",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names.into_iter().map(|(name,)| name).collect())
    }

    pub async fn admin_exists(&self) -> Result<bool, DbError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE is_admin)")
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Flip `is_active` and append the matching audit row in one transaction.
    pub async fn set_active(&self, admin: &str, target: &str, active: bool) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE users SET is_active = $1 WHERE username = $2")
            .bind(active)
            .bind(target)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: target.to_owned(),
            });
        }

        let action = if active {
            AdminAction::Reactivated
        } else {
            AdminAction::Deactivated
        };
        AdminLogRepo::record_with(&mut *tx, admin, action, target).await?;

        tx.commit().await?;
        Ok(())
    }
}
