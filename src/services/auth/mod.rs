pub mod account;
pub mod factory;
pub mod password;
pub mod token_codec;

pub use account::{AccountService, ROLE_ADMIN, ROLE_USER};
pub use factory::build_services;
pub use password::PasswordHasher;
pub use token_codec::{InvalidToken, TokenCodec, VerifiedToken};
