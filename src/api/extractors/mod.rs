/*
 * Responsibility
 * - handler が受け取る extractor の re-export
 */
pub mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
