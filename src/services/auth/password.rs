use tracing::{debug, error};

use crate::error::AppError;

/// bcrypt only reads this many bytes of input; longer plaintexts are refused
/// instead of being silently cut.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password longer than {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
    #[error("bcrypt hash failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("blocking hash task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooLong => AppError::malformed("INVALID_PASSWORD", e.to_string()),
            _ => {
                error!(error = %e, "password hashing failed");
                AppError::Internal
            }
        }
    }
}

/// bcrypt wrapper.
///
/// - `hash` は呼び出しごとに新しい salt を生成する (同じ平文でも結果は毎回異なる)
/// - `verify` は埋め込まれた salt で再計算し、定数時間で比較する (bcrypt crate 側)
/// - 壊れた hash 文字列は `false` 扱い (エラーとして上位に漏らさない)
/// - 72 bytes を超える平文は切り詰めない: hash は `TooLong`、verify は `false`
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        Ok(bcrypt::non_truncating_hash(plaintext, self.cost)?)
    }

    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        match bcrypt::non_truncating_verify(plaintext, hashed) {
            Ok(matched) => matched,
            Err(e) => {
                debug!(error = %e, "password verification failed");
                false
            }
        }
    }

    // bcrypt is slow on purpose; keep it off the async worker threads.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    pub async fn verify_blocking(&self, plaintext: String, hashed: String) -> bool {
        let hasher = *self;
        match tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hashed)).await {
            Ok(matched) => matched,
            Err(e) => {
                error!(error = %e, "blocking verify task failed");
                false
            }
        }
    }
}
