/*
 * Responsibility
 * - URL 構造を定義
 * - 認証の要否はここではなく AuthorizationTable (middleware::auth) が決める
 */
use axum::{Router, routing::get, routing::post};

use crate::error::AppError;
use crate::state::AppState;

use crate::api::handlers::{
    auth::{authenticate, signup},
    hello::hello,
    ops::favicon,
    users::{my_user, profile, user_by_name},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/hello", get(hello))
        .route("/api/authenticate", post(authenticate))
        .route("/api/signup", post(signup))
        .route("/api/profile", get(profile))
        .route("/api/user", get(my_user))
        .route("/api/user/{username}", get(user_by_name))
        .route("/favicon.ico", get(favicon))
        // set before the security layers so unknown paths are fail-closed too
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("resource")
}
