/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use tracing::info;

use crate::config::{Config, SeedAdmin};
use crate::error::AppError;
use crate::repos::user_repo::InMemoryUserRepo;
use crate::services::auth::{AccountService, PasswordHasher, ROLE_ADMIN, ROLE_USER, TokenCodec};

pub struct AuthServices {
    pub codec: Arc<TokenCodec>,
    pub accounts: Arc<AccountService>,
}

pub async fn build_services(config: &Config) -> Result<AuthServices, AppError> {
    let codec = Arc::new(TokenCodec::new(
        &config.jwt_secret,
        config.token_validity_seconds,
    ));
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepo::new()),
        PasswordHasher::new(config.bcrypt_cost),
        codec.clone(),
    ));

    if let Some(seed) = &config.seed_admin {
        seed_admin(&accounts, seed).await?;
    }

    Ok(AuthServices { codec, accounts })
}

async fn seed_admin(accounts: &AccountService, seed: &SeedAdmin) -> Result<(), AppError> {
    accounts
        .register(
            &seed.username,
            &seed.password,
            &seed.username,
            [ROLE_USER, ROLE_ADMIN],
        )
        .await?;
    info!(username = %seed.username, "seeded admin account");
    Ok(())
}
