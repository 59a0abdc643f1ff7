use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppError;
use crate::repos::user_repo::{UserRepo, UserRow};
use crate::services::auth::password::{MAX_PASSWORD_BYTES, PasswordHasher};
use crate::services::auth::token_codec::{IssuedToken, TokenCodec};

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

fn char_len_between(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.chars().count())
}

/// Username rule shared by signup and the seeded admin.
pub fn check_username(username: &str) -> Result<(), &'static str> {
    if !char_len_between(username.trim(), 3, 50) || username.trim() != username {
        return Err("username must be 3-50 chars without surrounding whitespace");
    }
    Ok(())
}

/// Password rule shared by signup and the seeded admin.
pub fn check_password(password: &str) -> Result<(), &'static str> {
    if !char_len_between(password, 3, 100) {
        return Err("password must be 3-100 chars");
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err("password must be at most 72 bytes");
    }
    Ok(())
}

/// Service that owns signup and login.
///
/// - PasswordHasher is responsible for credential hashing/verification.
/// - TokenCodec is responsible for minting the bearer token on successful login.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepo>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("hasher", &self.hasher)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepo>, hasher: PasswordHasher, codec: Arc<TokenCodec>) -> Self {
        Self {
            users,
            hasher,
            codec,
        }
    }

    /// Register a regular user (`ROLE_USER`).
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
    ) -> Result<UserRow, AppError> {
        self.register(username, password, nickname, [ROLE_USER])
            .await
    }

    /// Register a user with an explicit authority set.
    pub async fn register<const N: usize>(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
        authorities: [&str; N],
    ) -> Result<UserRow, AppError> {
        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;

        let row = self
            .users
            .insert(UserRow {
                username: username.to_string(),
                password_hash,
                nickname: nickname.to_string(),
                activated: true,
                authorities: authorities.iter().map(|a| a.to_string()).collect(),
            })
            .await?;

        info!(username = %row.username, authorities = ?row.authorities, "user registered");
        Ok(row)
    }

    /// Check the username/password pair and issue a bearer token.
    ///
    /// Unknown user, deactivated user and wrong password are all reported as
    /// `InvalidCredentials`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            info!(username = %username, "login rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !user.activated {
            info!(username = %username, "login rejected: account not activated");
            return Err(AppError::InvalidCredentials);
        }

        let matched = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await;
        if !matched {
            info!(username = %username, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let issued = self
            .codec
            .issue_default(&user.username, user.authorities.iter().cloned())?;
        debug!(username = %username, expires_at = %issued.expires_at, "token issued");

        Ok(issued)
    }

    pub async fn find_user(&self, username: &str) -> Result<UserRow, AppError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(AppError::NotFound("user"))
    }
}
