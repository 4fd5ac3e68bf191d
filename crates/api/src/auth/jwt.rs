//! Signed access/refresh token issuance and verification.
//!
//! Both token classes are HS256-signed JWTs carrying a fixed [`Claims`]
//! record; they differ only in lifetime and the embedded [`TokenKind`].
//! A refresh token is additionally validated against the session store by
//! the credential handlers -- only its SHA-256 hash is persisted server-side
//! so a database leak does not compromise active sessions.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use taskora_core::types::DbId;

/// Which class of token a [`Claims`] payload belongs to.
///
/// Verification rejects a token presented as the wrong kind, so a long-lived
/// refresh token can never be replayed as an access token or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email address.
    pub email: String,
    /// Whether the account was activated when the token was minted.
    pub activated: bool,
    /// Token class (`access` or `refresh`).
    pub kind: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4). Guarantees two tokens minted for
    /// the same user within the same second still differ, which rotation
    /// depends on.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 30, the cookie horizon).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty. A missing signing key
    /// is a fatal misconfiguration, not a recoverable error.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

/// Generate a short-lived HS256 access token for the given user.
pub fn issue_access_token(
    user_id: DbId,
    email: &str,
    activated: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(
        user_id,
        email,
        activated,
        TokenKind::Access,
        config.access_token_expiry_mins * 60,
        config,
    )
}

/// Generate a long-lived HS256 refresh token for the given user.
pub fn issue_refresh_token(
    user_id: DbId,
    email: &str,
    activated: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(
        user_id,
        email,
        activated,
        TokenKind::Refresh,
        config.refresh_token_expiry_days * 24 * 60 * 60,
        config,
    )
}

fn issue_token(
    user_id: DbId,
    email: &str,
    activated: bool,
    kind: TokenKind,
    lifetime_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        activated,
        kind,
        exp: now + lifetime_secs,
        iat: now,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token of the expected kind, returning its [`Claims`].
///
/// Checks the signature, expiration, and the embedded `kind` claim. Malformed,
/// tampered, expired, and wrong-kind tokens all return `Err` -- this is an
/// expected, frequently-hit path, never a panic.
pub fn verify_token(
    token: &str,
    kind: TokenKind,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;

    if token_data.claims.kind != kind {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }

    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a refresh token.
///
/// The digest is what the session store persists and looks rows up by;
/// hashing is deterministic, so byte-equality of tokens is preserved as
/// hash equality.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
