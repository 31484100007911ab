//! HTTP layer
//!
//! Axum server with:
//! - Server-rendered HTML pages
//! - Signed cookie sessions
//! - Request tracing
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod views;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub use error::AppError;
pub use server::{build_router, run_server, ServerConfig, ServerError};

/// 302 Found to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_owned())]).into_response()
}

/// 302 Found to `location`, setting a cookie on the way.
pub fn redirect_with_cookie(location: &str, cookie: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (LOCATION, location.to_owned()),
            (SET_COOKIE, cookie.to_owned()),
        ],
    )
        .into_response()
}
