/*
 * Responsibility
 * - ignore list 上の運用向けエンドポイント (token filter / authorization の対象外)
 */
use axum::http::StatusCode;

/// Browsers request this on every page load; answer without touching security.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
