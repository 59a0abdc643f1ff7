//! access token (JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を読み、TokenCodec で検証する
//! - 成功時のみ AuthCtx を request extensions に格納する
//! - 失敗 (ヘッダなし / 形式不正 / 署名不一致 / 期限切れ) は「トークンなし」と同じ扱い
//! - この middleware 自身は決して拒否しない。拒否は authorization 側の責務

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::services::auth::TokenCodec;
use crate::state::AppState;

/// 全ルートにトークンフィルタを適用する。
///
/// authorization より外側 (= 先に実行される側) に積むこと：
/// ```ignore
/// let router = middleware::auth::authorization::apply(router, state.clone());
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if state.authz.is_ignored(req.uri().path()) {
        return next.run(req).await;
    }

    if let Some(auth_ctx) = resolve_identity(&state.codec, req.headers()) {
        // middleware → extractor への受け渡し
        req.extensions_mut().insert(auth_ctx);
    }

    next.run(req).await
}

/// Best-effort identity extraction. `None` covers both "no token" and "bad token".
pub fn resolve_identity(codec: &TokenCodec, headers: &HeaderMap) -> Option<AuthCtx> {
    let token = bearer_token(headers)?;

    match codec.validate(token) {
        Ok(verified) => Some(AuthCtx::from(verified)),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring bearer token");
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
