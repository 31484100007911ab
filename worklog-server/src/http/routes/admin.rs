//! Administration: admin accounts, user oversight and the audit trail

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;

use super::auth::{
    check_credentials, register, LoginForm, LoginOutcome, SignupForm, SignupRejection,
};
use crate::db::{AdminLogRepo, UserRepo};
use crate::http::error::AppError;
use crate::http::extractors::{CurrentSession, RequireAdmin};
use crate::http::views::{self, SignupValues};
use crate::http::{redirect, redirect_with_cookie};
use crate::journal::{Journal, ADMIN_ENTRY_PLACEHOLDER};
use crate::session::Session;
use crate::state::AppState;

const INVALID_ADMIN_LOGIN: &str = "Invalid admin credentials";

/// Where admins land after signing in
const ADMIN_DASHBOARD: &str = "/admin";

/// Whether this request may create an admin account.
///
/// The first admin can sign up freely; after that only a signed-in admin can.
async fn may_create_admin(state: &AppState, session: Option<&Session>) -> Result<bool, AppError> {
    let users = UserRepo::new(state.pool());
    if !users.admin_exists().await? {
        return Ok(true);
    }

    let Some(session) = session.filter(|s| s.is_admin) else {
        return Ok(false);
    };
    Ok(users
        .find(&session.username)
        .await?
        .is_some_and(|user| user.is_admin && user.is_active))
}

fn admin_signup_forbidden() -> AppError {
    AppError::Forbidden {
        reason: "Only an administrator can create administrator accounts.".to_string(),
    }
}

/// GET /admin-signup
async fn admin_signup_form(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, AppError> {
    if !may_create_admin(&state, session.as_ref()).await? {
        return Err(admin_signup_forbidden());
    }
    Ok(views::admin_signup_page(None, &SignupValues::default()).into_response())
}

/// POST /admin-signup
async fn admin_signup(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if !may_create_admin(&state, session.as_ref()).await? {
        return Err(admin_signup_forbidden());
    }

    let user = match register(&state, &form, true).await {
        Ok(user) => user,
        Err(SignupRejection::Invalid(message)) => {
            return Ok(views::admin_signup_page(Some(&message), &form.values()).into_response());
        }
        Err(SignupRejection::Failed(e)) => return Err(e),
    };

    match session.filter(|s| s.is_admin) {
        Some(creator) => {
            tracing::info!(admin = %creator.username, new_admin = %user.username, "admin account added");
            Ok(redirect(ADMIN_DASHBOARD))
        }
        None => {
            let session = state.sessions().issue(&user.username, true, Utc::now());
            Ok(redirect_with_cookie(
                ADMIN_DASHBOARD,
                &state.sessions().set_cookie(&session),
            ))
        }
    }
}

/// GET /admin-login
async fn admin_login_form() -> impl IntoResponse {
    views::admin_login_page(None)
}

/// POST /admin-login
async fn admin_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let admin = match check_credentials(&state, &form.username, &form.password).await? {
        LoginOutcome::Accepted(user) if user.is_admin => user,
        _ => {
            tracing::info!(user = %form.username.trim(), "admin login rejected");
            return Ok(views::admin_login_page(Some(INVALID_ADMIN_LOGIN)).into_response());
        }
    };

    let session = state.sessions().issue(&admin.username, true, Utc::now());
    tracing::info!(admin = %admin.username, "admin logged in");
    Ok(redirect_with_cookie(
        ADMIN_DASHBOARD,
        &state.sessions().set_cookie(&session),
    ))
}

/// POST /admin-logout - drop admin rights, keep the journal session
async fn admin_logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Response {
    match session {
        Some(session) => {
            let demoted = state.sessions().issue(&session.username, false, Utc::now());
            redirect_with_cookie("/admin-login", &state.sessions().set_cookie(&demoted))
        }
        None => redirect("/admin-login"),
    }
}

/// GET /admin-home
async fn admin_home(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
    views::admin_home(&admin.username)
}

/// GET /admin - all users with contact details and entry counts
async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Response, AppError> {
    let users = UserRepo::new(state.pool()).list_with_log_counts().await?;
    Ok(views::admin_dashboard(&admin.username, &users).into_response())
}

/// GET /admin/user-logs/{username}
async fn user_logs(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    if UserRepo::new(state.pool()).find(&username).await?.is_none() {
        return Err(AppError::NotFound {
            resource: "user",
            id: username,
        });
    }

    let entries = Journal::new(state.pool(), state.cipher())
        .entries(&username, ADMIN_ENTRY_PLACEHOLDER)
        .await?;
    tracing::info!(admin = %admin.username, user = %username, "admin viewed entries");
    Ok(views::admin_user_logs(&username, &entries).into_response())
}

async fn set_active(
    state: &AppState,
    admin: &str,
    target: &str,
    active: bool,
) -> Result<Response, AppError> {
    if admin == target {
        return Err(AppError::Forbidden {
            reason: "You cannot change the status of your own account.".to_string(),
        });
    }

    UserRepo::new(state.pool())
        .set_active(admin, target, active)
        .await?;
    tracing::info!(admin = %admin, user = %target, active, "account status changed");
    Ok(redirect(ADMIN_DASHBOARD))
}

/// POST /admin/deactivate/{username}
async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    set_active(&state, &admin.username, &username, false).await
}

/// POST /admin/reactivate/{username}
async fn reactivate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    set_active(&state, &admin.username, &username, true).await
}

/// GET /admin/audit-logs
async fn audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Response, AppError> {
    let logs = AdminLogRepo::new(state.pool()).list().await?;
    Ok(views::audit_logs_page(&logs).into_response())
}

/// Admin routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-signup", get(admin_signup_form).post(admin_signup))
        .route("/admin-login", get(admin_login_form).post(admin_login))
        .route("/admin-logout", post(admin_logout))
        .route("/admin-home", get(admin_home))
        .route(ADMIN_DASHBOARD, get(dashboard))
        .route("/admin/user-logs/{username}", get(user_logs))
        .route("/admin/deactivate/{username}", post(deactivate))
        .route("/admin/reactivate/{username}", post(reactivate))
        .route("/admin/audit-logs", get(audit_logs))
}
