//! Request authorization table.
//!
//! An ordered list of `(path pattern -> policy)` rules, scanned top to bottom.
//! The first matching rule decides; a path no rule matches requires an
//! authenticated identity (fail-closed).
//!
//! Paths on the ignore list bypass the token filter and this table entirely.
//! That list exists for operational endpoints (favicon, debug console) and is not
//! a security boundary.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Ant-style path pattern.
///
/// - `/api/hello`     matches exactly that path
/// - `/h2-console/**` matches `/h2-console` and everything beneath it
/// - `/api/*/items`   `*` matches exactly one non-empty segment
///
/// Segments are compared as-is, the same way the router sees them: a trailing
/// slash or a doubled slash is an empty segment, so `/api/hello/` is not
/// `/api/hello`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<String>,
    any_suffix: bool,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let (base, any_suffix) = match pattern.strip_suffix("/**") {
            Some(base) => (base, true),
            None => (pattern, false),
        };

        // "/**" has no base segments at all
        let segments = if base.is_empty() {
            Vec::new()
        } else {
            split(base).map(str::to_string).collect()
        };

        Self {
            segments,
            any_suffix,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split(path).collect();

        if parts.len() < self.segments.len()
            || (!self.any_suffix && parts.len() != self.segments.len())
        {
            return false;
        }

        self.segments
            .iter()
            .zip(&parts)
            .all(|(want, got)| (want == "*" && !got.is_empty()) || want == got)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    PermitAll,
    RequireAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny,
}

#[derive(Debug, Clone)]
pub struct AuthorizationRule {
    pub pattern: PathPattern,
    pub policy: Policy,
}

impl AuthorizationRule {
    pub fn new(pattern: &str, policy: Policy) -> Self {
        Self {
            pattern: PathPattern::new(pattern),
            policy,
        }
    }
}

/// Immutable after construction; shared read-only across requests.
#[derive(Debug, Clone)]
pub struct AuthorizationTable {
    ignored: Vec<PathPattern>,
    rules: Vec<AuthorizationRule>,
}

impl AuthorizationTable {
    pub fn new(ignored: Vec<PathPattern>, rules: Vec<AuthorizationRule>) -> Self {
        Self { ignored, rules }
    }

    /// The HTTP surface of this service.
    pub fn standard() -> Self {
        Self::new(
            vec![
                PathPattern::new("/h2-console/**"),
                PathPattern::new("/favicon.ico"),
            ],
            vec![
                AuthorizationRule::new("/api/hello", Policy::PermitAll),
                AuthorizationRule::new("/api/authenticate", Policy::PermitAll),
                AuthorizationRule::new("/api/signup", Policy::PermitAll),
            ],
        )
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored.iter().any(|p| p.matches(path))
    }

    pub fn policy_for(&self, path: &str) -> Policy {
        for rule in &self.rules {
            if rule.pattern.matches(path) {
                return rule.policy;
            }
        }
        Policy::RequireAuthenticated
    }

    pub fn decide(&self, path: &str, identity: Option<&AuthCtx>) -> Decision {
        match (self.policy_for(path), identity) {
            (Policy::PermitAll, _) => Decision::Permit,
            (Policy::RequireAuthenticated, Some(_)) => Decision::Permit,
            (Policy::RequireAuthenticated, None) => Decision::Deny,
        }
    }
}

/// Apply the authorization decision. Must run *after* the token filter.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, authorize))
}

async fn authorize(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_owned();

    if state.authz.is_ignored(&path) {
        return Ok(next.run(req).await);
    }

    let identity = req.extensions().get::<AuthCtx>();
    match state.authz.decide(&path, identity) {
        Decision::Permit => Ok(next.run(req).await),
        Decision::Deny => {
            tracing::debug!(path = %path, "unauthenticated request to protected path");
            Err(AppError::Unauthenticated)
        }
    }
}
