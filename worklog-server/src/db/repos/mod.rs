//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; one short statement per call
//! - Relies on DB constraints and maps conflicts (no check-then-insert)
//! - Transactions only where two writes must land together

pub mod admin_logs;
pub mod daily_logs;
pub mod summaries;
pub mod users;

pub use admin_logs::{AdminAction, AdminLog, AdminLogRepo};
pub use daily_logs::{DailyLog, DailyLogRepo};
pub use summaries::{SummaryRepo, WeeklySummary};
pub use users::{NewUser, User, UserOverview, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} '{id}' already exists")]
    Conflict { resource: &'static str, id: String },
}
