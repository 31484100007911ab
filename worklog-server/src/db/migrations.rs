//! Schema setup for the journal tables
//!
//! Idempotent: safe to run on every startup.

use sqlx::PgPool;

/// Create all tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running worklog migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            first_name TEXT,
            last_name TEXT,
            email TEXT,
            phone_number TEXT,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // entry holds ciphertext, never plaintext
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_logs (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL REFERENCES users(username),
            log_date DATE NOT NULL,
            entry TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weekly_summaries (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL REFERENCES users(username),
            week_start DATE NOT NULL,
            week_end DATE NOT NULL,
            summary TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK (week_end >= week_start)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // target_user is not a foreign key: the trail must outlive any row it names
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_logs (
            id BIGSERIAL PRIMARY KEY,
            admin_username TEXT NOT NULL,
            action TEXT NOT NULL,
            target_user TEXT NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Worklog migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_daily_logs_user_date ON daily_logs(username, log_date)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_weekly_summaries_user_week ON weekly_summaries(username, week_start)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_admin_logs_timestamp ON admin_logs(timestamp DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
