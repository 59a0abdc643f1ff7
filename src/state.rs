/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - 起動時に一度だけ組み立て、以後は読み取り専用 (署名鍵・ルール表)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::middleware::auth::AuthorizationTable;
use crate::services::auth::{AccountService, TokenCodec};

#[derive(Clone, Debug)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub accounts: Arc<AccountService>,
    pub authz: Arc<AuthorizationTable>,
}

impl AppState {
    pub fn new(
        codec: Arc<TokenCodec>,
        accounts: Arc<AccountService>,
        authz: Arc<AuthorizationTable>,
    ) -> Self {
        Self {
            codec,
            accounts,
            authz,
        }
    }
}
