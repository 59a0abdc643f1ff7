/*
 * Responsibility
 * - POST /api/authenticate: username/password → bearer token
 * - POST /api/signup: 新規ユーザー登録 (ROLE_USER)
 * - どちらも permit-all
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};

use crate::{
    api::dto::{
        auth::{LoginRequest, TokenDto},
        users::{SignupRequest, UserResponse},
    },
    error::AppError,
    state::AppState,
};

pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<TokenDto>), AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|msg| AppError::malformed("INVALID_LOGIN", msg))?;

    let issued = state
        .accounts
        .authenticate(&req.username, &req.password)
        .await?;

    // Echo the token the way a client would send it back.
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", issued.token))
        .map_err(|_| AppError::Internal)?;
    headers.insert(header::AUTHORIZATION, bearer);

    Ok((
        headers,
        Json(TokenDto {
            token: issued.token,
        }),
    ))
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|msg| AppError::malformed("INVALID_SIGNUP", msg))?;

    let row = state
        .accounts
        .signup(&req.username, &req.password, req.nickname.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(row))))
}
