//! Stateless JWT authentication gateway.
//!
//! Request pipeline: token filter (best-effort identity) → authorization table
//! (permit-all / require-authenticated, fail-closed) → handler capability check.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

pub use app::{build_router, build_state};
pub use config::Config;
pub use state::AppState;
