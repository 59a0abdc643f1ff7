use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::AppError;

/// Every validation failure collapses into this single outcome.
///
/// Signature mismatch, malformed structure, wrong algorithm and expiry are
/// intentionally indistinguishable to callers; the reason is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// Access token claims (HS512 JWT).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Result of a successful `issue`.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Claims that survived verification, in the shape the rest of the app uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub roles: BTreeSet<String>,
    pub issued_at: i64,
    pub expires_at: i64,
    pub jti: String,
}

/// Signs and verifies bearer tokens with a process-wide HMAC key.
///
/// The key is loaded once at startup. Replacing it invalidates every token
/// issued under the previous key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS512)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        // exp is checked against our own clock in `validate_at` (exp itself counts as expired).
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a token with the configured lifetime.
    pub fn issue_default<I, S>(&self, subject: &str, roles: I) -> Result<IssuedToken, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue(subject, roles, self.ttl_seconds)
    }

    pub fn issue<I, S>(
        &self,
        subject: &str,
        roles: I,
        ttl_seconds: u64,
    ) -> Result<IssuedToken, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue_at(subject, roles, ttl_seconds, Utc::now())
    }

    /// Issue with an explicit clock. `issue` is `issue_at(.., Utc::now())`.
    pub fn issue_at<I, S>(
        &self,
        subject: &str,
        roles: I,
        ttl_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if subject.trim().is_empty() {
            return Err(AppError::malformed("INVALID_SUBJECT", "subject must not be empty"));
        }

        let ttl = i64::try_from(ttl_seconds).map_err(|_| AppError::Internal)?;
        let iat = now.timestamp();
        let exp = iat.checked_add(ttl).ok_or(AppError::Internal)?;

        // dedupe + stable order
        let roles: BTreeSet<String> = roles.into_iter().map(Into::into).collect();

        let claims = TokenClaims {
            sub: subject.to_string(),
            roles: roles.into_iter().collect(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS512);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })?;

        Ok(IssuedToken {
            token,
            issued_at: timestamp(iat)?,
            expires_at: timestamp(exp)?,
        })
    }

    pub fn validate(&self, token: &str) -> Result<VerifiedToken, InvalidToken> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Verify signature and structure, then require `now < exp`.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<VerifiedToken, InvalidToken> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                InvalidToken
            })?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            debug!("token rejected: empty sub");
            return Err(InvalidToken);
        }
        if now >= claims.exp {
            debug!(exp = claims.exp, now, "token rejected: expired");
            return Err(InvalidToken);
        }

        Ok(VerifiedToken {
            subject: claims.sub,
            roles: claims.roles.into_iter().collect(),
            issued_at: claims.iat,
            expires_at: claims.exp,
            jti: claims.jti,
        })
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AppError> {
    Utc.timestamp_opt(secs, 0).single().ok_or(AppError::Internal)
}
