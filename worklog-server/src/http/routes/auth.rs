//! Login, signup and logout for journal users

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::crypto::{hash_password, verify_password};
use crate::db::{DbError, NewUser, User, UserRepo};
use crate::http::error::AppError;
use crate::http::redirect_with_cookie;
use crate::http::views::{self, SignupValues};
use crate::models::{ContactDetails, NewPassword, Username, ValidationError};
use crate::state::AppState;

pub(crate) const INVALID_LOGIN: &str = "Invalid username or password.";
pub(crate) const ACCOUNT_DEACTIVATED: &str = "This account has been deactivated.";
pub(crate) const USERNAME_TAKEN: &str = "Username already exists.";

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form, shared with admin signup
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

impl SignupForm {
    pub(crate) fn values(&self) -> SignupValues<'_> {
        SignupValues {
            username: &self.username,
            first_name: &self.first_name,
            last_name: &self.last_name,
            email: &self.email,
            phone_number: &self.phone_number,
        }
    }
}

/// Outcome of checking credentials
#[derive(Debug)]
pub(crate) enum LoginOutcome {
    Accepted(User),
    Rejected,
    Deactivated,
}

/// Look up the account and check the password.
pub(crate) async fn check_credentials(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<LoginOutcome, AppError> {
    let Some(user) = UserRepo::new(state.pool()).find(username.trim()).await? else {
        return Ok(LoginOutcome::Rejected);
    };

    if !verify_password(password, &user.password_hash).await? {
        return Ok(LoginOutcome::Rejected);
    }
    if !user.is_active {
        return Ok(LoginOutcome::Deactivated);
    }
    Ok(LoginOutcome::Accepted(user))
}

/// Why a signup attempt was turned away
#[derive(Debug)]
pub(crate) enum SignupRejection {
    /// Shown to the user on the form
    Invalid(String),
    Failed(AppError),
}

impl From<AppError> for SignupRejection {
    fn from(e: AppError) -> Self {
        Self::Failed(e)
    }
}

/// Validate the form and create the account.
pub(crate) async fn register(
    state: &AppState,
    form: &SignupForm,
    is_admin: bool,
) -> Result<User, SignupRejection> {
    let invalid = |e: ValidationError| SignupRejection::Invalid(e.to_string());

    let username = Username::new(&form.username).map_err(invalid)?;
    let password = NewPassword::new(&form.password).map_err(invalid)?;
    let contact = ContactDetails::new(
        Some(&form.first_name),
        Some(&form.last_name),
        Some(&form.email),
        Some(&form.phone_number),
    )
    .map_err(invalid)?;

    let password_hash = hash_password(password.as_str())
        .await
        .map_err(AppError::from)?;

    let created = UserRepo::new(state.pool())
        .create(NewUser {
            username: &username,
            password_hash: &password_hash,
            contact: &contact,
            is_admin,
        })
        .await;

    match created {
        Ok(user) => {
            tracing::info!(user = %user.username, is_admin, "account created");
            Ok(user)
        }
        Err(DbError::Conflict { .. }) => {
            Err(SignupRejection::Invalid(USERNAME_TAKEN.to_string()))
        }
        Err(e) => Err(AppError::from(e).into()),
    }
}

/// GET /login
async fn login_form() -> impl IntoResponse {
    views::login_page(None, "")
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match check_credentials(&state, &form.username, &form.password).await? {
        LoginOutcome::Accepted(user) => user,
        LoginOutcome::Rejected => {
            tracing::info!(user = %form.username.trim(), "login rejected");
            return Ok(views::login_page(Some(INVALID_LOGIN), &form.username).into_response());
        }
        LoginOutcome::Deactivated => {
            let page = views::login_page(Some(ACCOUNT_DEACTIVATED), &form.username);
            return Ok(page.into_response());
        }
    };

    let session = state.sessions().issue(&user.username, false, Utc::now());
    tracing::info!(user = %user.username, "logged in");
    Ok(redirect_with_cookie("/", &state.sessions().set_cookie(&session)))
}

/// GET /signup
async fn signup_form() -> impl IntoResponse {
    views::signup_page(None, &SignupValues::default())
}

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let user = match register(&state, &form, false).await {
        Ok(user) => user,
        Err(SignupRejection::Invalid(message)) => {
            return Ok(views::signup_page(Some(&message), &form.values()).into_response());
        }
        Err(SignupRejection::Failed(e)) => return Err(e),
    };

    let session = state.sessions().issue(&user.username, false, Utc::now());
    Ok(redirect_with_cookie("/", &state.sessions().set_cookie(&session)))
}

/// GET /logout
async fn logout(State(state): State<AppState>) -> Response {
    redirect_with_cookie("/", &state.sessions().clear_cookie())
}

/// Authentication routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/signup", get(signup_form).post(signup))
        .route("/logout", get(logout))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::crypto::{generate_key, FieldCipher};
    use crate::db::repos::test_support;
    use crate::session::SessionSigner;

    const PASSWORD: &str = "Corr3ct!horse";

    async fn state() -> AppState {
        let pool = test_support::pool().await;
        let cipher = FieldCipher::from_base64_key(&generate_key()).unwrap();
        let sessions = SessionSigner::new(
            "0123456789abcdef0123456789abcdef",
            Duration::from_secs(3600),
            false,
        );
        AppState::new(pool, cipher, sessions, None)
    }

    fn signup_form(username: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            password: PASSWORD.to_string(),
            email: "someone@example.com".to_string(),
            ..SignupForm::default()
        }
    }

    #[test]
    fn signup_values_echo_the_form() {
        let form = SignupForm {
            first_name: "Ada".into(),
            ..signup_form("ada")
        };
        let values = form.values();
        assert_eq!(values.username, "ada");
        assert_eq!(values.first_name, "Ada");
        assert_eq!(values.email, "someone@example.com");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn login_accepts_right_password_and_rejects_wrong_one() {
        let state = state().await;
        let username = test_support::unique_username("login");
        register(&state, &signup_form(&username), false).await.unwrap();

        let outcome = check_credentials(&state, &username, PASSWORD).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Accepted(ref u) if u.username == username));

        let outcome = check_credentials(&state, &username, "Wr0ng!pass").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected));

        let outcome = check_credentials(&state, "nobody_here", PASSWORD).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deactivated_account_cannot_log_in() {
        let state = state().await;
        let admin = test_support::unique_username("adm");
        let username = test_support::unique_username("gone");
        register(&state, &signup_form(&admin), true).await.unwrap();
        register(&state, &signup_form(&username), false).await.unwrap();

        UserRepo::new(state.pool())
            .set_active(&admin, &username, false)
            .await
            .unwrap();

        let outcome = check_credentials(&state, &username, PASSWORD).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Deactivated));

        // wrong password on a deactivated account reveals nothing extra
        let outcome = check_credentials(&state, &username, "Wr0ng!pass").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_signup_is_reported_on_the_form() {
        let state = state().await;
        let username = test_support::unique_username("dup");
        register(&state, &signup_form(&username), false).await.unwrap();

        match register(&state, &signup_form(&username), false).await {
            Err(SignupRejection::Invalid(message)) => assert_eq!(message, USERNAME_TAKEN),
            other => panic!("expected rejection, got {:?}", other.map(|u| u.username)),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn weak_password_is_reported_on_the_form() {
        let state = state().await;
        let form = SignupForm {
            password: "password".into(),
            ..signup_form(&test_support::unique_username("weak"))
        };

        match register(&state, &form, false).await {
            Err(SignupRejection::Invalid(message)) => {
                assert_eq!(message, ValidationError::WeakPassword.to_string())
            }
            other => panic!("expected rejection, got {:?}", other.map(|u| u.username)),
        }
    }
}
