pub mod auth;
pub mod hello;
pub mod ops;
pub mod users;
