//! Terminal responses for the two security failure families.
//!
//! - 401: identity absent (or credentials rejected). The client must authenticate again.
//! - 403: identity present but lacking a required role. Re-authenticating will not help.
//!
//! The bodies never name the rule or role that failed.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::ErrorResponse;

/// Fired when a `RequireAuthenticated` path is reached without a valid identity.
pub fn authentication_entry_point() -> Response {
    unauthorized(ErrorResponse::new(
        "UNAUTHORIZED",
        "authentication required; sign in again to obtain a new token",
    ))
}

/// Fired by `/api/authenticate` when the username/password pair is rejected.
pub fn invalid_credentials() -> Response {
    unauthorized(ErrorResponse::new(
        "INVALID_CREDENTIALS",
        "invalid username or password",
    ))
}

/// Fired when an authenticated caller lacks the capability a handler requires.
pub fn access_denied_handler() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse::new("FORBIDDEN", "insufficient privileges")),
    )
        .into_response()
}

fn unauthorized(body: ErrorResponse) -> Response {
    let mut res = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    res.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    res
}
