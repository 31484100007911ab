//! Journal home page and daily entries

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::parse_date;
use crate::db::UserRepo;
use crate::http::error::AppError;
use crate::http::extractors::{CurrentSession, RequireUser};
use crate::http::{redirect, views};
use crate::journal::{Journal, ENTRY_PLACEHOLDER};
use crate::models::{EntryText, ValidationError};
use crate::state::AppState;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Daily entry form
#[derive(Debug, Deserialize)]
pub struct LogForm {
    #[serde(default)]
    pub log_date: String,
    #[serde(default)]
    pub entry: String,
}

async fn render_index(
    state: &AppState,
    username: &str,
    error: Option<&str>,
) -> Result<Response, AppError> {
    let entries = Journal::new(state.pool(), state.cipher())
        .entries(username, ENTRY_PLACEHOLDER)
        .await?;
    Ok(views::index_page(username, &entries, today(), error).into_response())
}

/// GET / - landing page, or the journal when signed in
async fn index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, AppError> {
    let Some(session) = session else {
        return Ok(views::landing().into_response());
    };

    match UserRepo::new(state.pool()).find(&session.username).await? {
        Some(user) if user.is_active => render_index(&state, &user.username, None).await,
        _ => Ok((
            [(axum::http::header::SET_COOKIE, state.sessions().clear_cookie())],
            views::landing(),
        )
            .into_response()),
    }
}

fn validate_log(form: &LogForm) -> Result<(NaiveDate, EntryText), ValidationError> {
    let log_date = parse_date(&form.log_date, "log date")?;
    let entry = EntryText::new(&form.entry)?;
    Ok((log_date, entry))
}

/// POST /log - encrypt and store a daily entry
async fn log_entry(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<LogForm>,
) -> Result<Response, AppError> {
    let (log_date, entry) = match validate_log(&form) {
        Ok(valid) => valid,
        Err(e) => return render_index(&state, &user.username, Some(&e.to_string())).await,
    };

    Journal::new(state.pool(), state.cipher())
        .record_entry(&user.username, log_date, &entry)
        .await?;

    Ok(redirect("/"))
}

/// Journal routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/log", post(log_entry))
}
