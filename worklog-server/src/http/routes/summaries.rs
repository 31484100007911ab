//! Weekly summaries: listing, manual submission and generation

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Local;
use serde::Deserialize;

use super::parse_date;
use crate::http::error::AppError;
use crate::http::extractors::RequireUser;
use crate::http::{redirect, views};
use crate::journal::Journal;
use crate::models::{SummaryText, ValidationError, Week};
use crate::state::AppState;

/// Manual summary form
#[derive(Debug, Deserialize)]
pub struct SubmitSummaryForm {
    #[serde(default)]
    pub week_start: String,
    #[serde(default)]
    pub week_end: String,
    #[serde(default)]
    pub summary: String,
}

impl SubmitSummaryForm {
    fn validate(&self) -> Result<(Week, SummaryText), ValidationError> {
        let start = parse_date(&self.week_start, "week start")?;
        let end = parse_date(&self.week_end, "week end")?;
        let week = Week::new(start, end)?;
        let summary = SummaryText::new(&self.summary)?;
        Ok((week, summary))
    }
}

async fn render_summaries(
    state: &AppState,
    username: &str,
    error: Option<&str>,
) -> Result<Response, AppError> {
    let summaries = Journal::new(state.pool(), state.cipher())
        .summaries(username)
        .await?;
    Ok(views::summaries_page(&summaries, error).into_response())
}

/// GET /summaries
async fn list_summaries(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Response, AppError> {
    render_summaries(&state, &user.username, None).await
}

/// POST /submit-summary
async fn submit_summary(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<SubmitSummaryForm>,
) -> Result<Response, AppError> {
    let (week, summary) = match form.validate() {
        Ok(valid) => valid,
        Err(e) => return render_summaries(&state, &user.username, Some(&e.to_string())).await,
    };

    Journal::new(state.pool(), state.cipher())
        .submit_summary(&user.username, week, &summary)
        .await?;

    Ok(redirect("/summaries"))
}

/// POST /generate-summary - summarize the current week now
async fn generate_summary(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Response, AppError> {
    let summarizer = state.summarizer().ok_or(AppError::SummariesDisabled)?;
    let today = Local::now().date_naive();

    let generated = Journal::new(state.pool(), state.cipher())
        .generate_weekly_summary(summarizer, &user.username, today)
        .await?;

    match generated {
        Some(_) => Ok(redirect("/summaries")),
        None => Ok(redirect("/")),
    }
}

/// Summary routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summaries", get(list_summaries))
        .route("/submit-summary", post(submit_summary))
        .route("/generate-summary", post(generate_summary))
}
