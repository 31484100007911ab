//! Session extractors
//!
//! `CurrentSession` never rejects. `RequireUser` and `RequireAdmin` re-check
//! the account in the database on every request, so deactivation takes effect
//! immediately even for cookies issued earlier.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use super::error::AppError;
use super::redirect_with_cookie;
use crate::db::{User, UserRepo};
use crate::session::Session;
use crate::state::AppState;

/// The verified session, if the request carries one
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.sessions().from_headers(&parts.headers, Utc::now())))
    }
}

/// Rejection for the auth extractors
#[derive(Debug)]
pub enum AuthRejection {
    /// Send the browser to a login page, dropping any stale cookie
    Login {
        location: &'static str,
        clear_cookie: Option<String>,
    },
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Login {
                location,
                clear_cookie,
            } => match clear_cookie {
                Some(cookie) => redirect_with_cookie(location, &cookie),
                None => super::redirect(location),
            },
            Self::Error(e) => e.into_response(),
        }
    }
}

impl From<AppError> for AuthRejection {
    fn from(e: AppError) -> Self {
        Self::Error(e)
    }
}

async fn session_user(
    parts: &Parts,
    state: &AppState,
    location: &'static str,
) -> Result<(Session, User), AuthRejection> {
    let Some(session) = state.sessions().from_headers(&parts.headers, Utc::now()) else {
        return Err(AuthRejection::Login {
            location,
            clear_cookie: None,
        });
    };

    let user = UserRepo::new(state.pool())
        .find(&session.username)
        .await
        .map_err(AppError::from)?;

    match user {
        Some(user) if user.is_active => Ok((session, user)),
        _ => {
            tracing::info!(user = %session.username, "rejecting session for missing or inactive account");
            Err(AuthRejection::Login {
                location,
                clear_cookie: Some(state.sessions().clear_cookie()),
            })
        }
    }
}

/// A signed-in, active user
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (_, user) = session_user(parts, state, "/login").await?;
        Ok(Self(user))
    }
}

/// A signed-in, active administrator who entered through the admin login
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (session, user) = session_user(parts, state, "/admin-login").await?;
        if !session.is_admin || !user.is_admin {
            return Err(AuthRejection::Login {
                location: "/admin-login",
                clear_cookie: None,
            });
        }
        Ok(Self(user))
    }
}
