/*
 * Responsibility
 * - 環境変数からの設定読み込み (JWT secret, token TTL, bcrypt cost, CORS 許可など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::services::auth::account::{check_password, check_username};

/// HS512 の鍵はハッシュのブロック長 (64 bytes) 以上を要求する。
pub const MIN_JWT_SECRET_BYTES: usize = 64;

/// exp = iat + TTL が chrono の範囲に収まるよう上限を設ける (10 年)。
pub const MAX_TOKEN_VALIDITY_SECONDS: u64 = 10 * 365 * 86_400;

pub const DEFAULT_BCRYPT_COST: u32 = 10;
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Optional account created at startup so a fresh (in-memory) instance has an administrator.
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // decoded HMAC key (HS512)
    pub jwt_secret: Vec<u8>,
    pub token_validity_seconds: u64,

    pub bcrypt_cost: u32,
    pub seed_admin: Option<SeedAdmin>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_validity_seconds", &self.token_validity_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("seed_admin", &self.seed_admin)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let raw_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let jwt_secret = STANDARD
            .decode(raw_secret.trim())
            .map_err(|_| ConfigError::Invalid("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let token_validity_seconds = match lookup("JWT_TOKEN_VALIDITY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|v| (1..=MAX_TOKEN_VALIDITY_SECONDS).contains(v))
                .ok_or(ConfigError::Invalid("JWT_TOKEN_VALIDITY_SECONDS"))?,
            None => 86_400, // 1 day
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|c| BCRYPT_COST_RANGE.contains(c))
                .ok_or(ConfigError::Invalid("BCRYPT_COST"))?,
            None => DEFAULT_BCRYPT_COST,
        };

        let seed_admin = match (lookup("SEED_ADMIN_USERNAME"), lookup("SEED_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => {
                check_username(&username)
                    .map_err(|_| ConfigError::Invalid("SEED_ADMIN_USERNAME"))?;
                check_password(&password)
                    .map_err(|_| ConfigError::Invalid("SEED_ADMIN_PASSWORD"))?;
                Some(SeedAdmin { username, password })
            }
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("SEED_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("SEED_ADMIN_USERNAME")),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            token_validity_seconds,
            bcrypt_cost,
            seed_admin,
        })
    }
}
