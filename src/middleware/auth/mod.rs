pub mod access;
pub mod authorization;
pub mod entry_point;

pub use authorization::{AuthorizationRule, AuthorizationTable, Decision, PathPattern, Policy};
