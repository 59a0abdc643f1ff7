/*
 * Responsibility
 * - 認証必須の handler 群
 * - role が必要なものは handler 冒頭で AuthCtx::require_any_role を呼ぶ
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::{
        dto::users::{ProfileResponse, UserResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    services::auth::{ROLE_ADMIN, ROLE_USER},
    state::AppState,
};

/// GET /api/profile: the identity carried by the token itself.
pub async fn profile(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        subject: ctx.subject,
        roles: ctx.roles.into_iter().collect(),
    })
}

/// GET /api/user: the stored account of the caller.
pub async fn my_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    ctx.require_any_role(&[ROLE_USER, ROLE_ADMIN])?;

    let row = state.accounts.find_user(&ctx.subject).await?;
    Ok(Json(row.into()))
}

/// GET /api/user/{username}: admin lookup of any account.
pub async fn user_by_name(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    ctx.require_any_role(&[ROLE_ADMIN])?;

    let row = state.accounts.find_user(&username).await?;
    Ok(Json(row.into()))
}
