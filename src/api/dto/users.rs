/*
 * Responsibility
 * - signup / user 照会の request/response DTO
 * - validate() で形式チェック (長さ制約)
 */
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::UserRow;
use crate::services::auth::account::{check_password, check_username};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub nickname: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("nickname", &self.nickname)
            .finish_non_exhaustive()
    }
}

fn char_len_between(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.chars().count())
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_username(&self.username)?;
        check_password(&self.password)?;
        if !char_len_between(self.nickname.trim(), 3, 50) {
            return Err("nickname must be 3-50 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub nickname: String,
    pub authorities: Vec<String>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            nickname: row.nickname,
            authorities: row.authorities.into_iter().collect(),
        }
    }
}

/// Identity as carried by the presented token (no store lookup).
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub subject: String,
    pub roles: Vec<String>,
}
