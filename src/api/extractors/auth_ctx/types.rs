/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - token filter が検証して request extensions に格納し、handler はこの型だけを受け取る
 * - リクエスト終了とともに破棄される (サーバ側にセッションは持たない)
 */
use std::collections::BTreeSet;

use crate::error::AppError;
use crate::services::auth::VerifiedToken;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` は token の `sub` (username)
/// - `roles` は token に焼き込まれた権限。発行後のロール変更は次回ログインまで反映されない
/// - `jti` はログ相関用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub roles: BTreeSet<String>,
    pub jti: Option<String>,
}

impl AuthCtx {
    pub fn new<I, S>(subject: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            roles: roles.into_iter().map(Into::into).collect(),
            jti: None,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Capability check for the start of a handler.
    ///
    /// Holding any one of `roles` is enough; otherwise 403.
    pub fn require_any_role(&self, roles: &[&str]) -> Result<(), AppError> {
        if roles.iter().any(|r| self.has_role(r)) {
            Ok(())
        } else {
            tracing::debug!(subject = %self.subject, "access denied: missing role");
            Err(AppError::Forbidden)
        }
    }
}

impl From<VerifiedToken> for AuthCtx {
    fn from(v: VerifiedToken) -> Self {
        Self {
            subject: v.subject,
            roles: v.roles,
            jti: Some(v.jti),
        }
    }
}
