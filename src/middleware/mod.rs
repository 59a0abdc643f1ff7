/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: token filter / authorization table / 401・403 終端ハンドラ
 * - cors, http, security_headers: 横断的な HTTP 設定
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
