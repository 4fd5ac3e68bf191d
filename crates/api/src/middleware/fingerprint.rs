//! Device fingerprint extractor.
//!
//! Every credential operation is scoped to one device; the fingerprint is
//! derived from the client's `User-Agent` string. The hash keeps the stored
//! value opaque and equality-comparable -- fingerprint strength is policy,
//! not a correctness invariant, so swapping the derivation does not affect
//! the session store.

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use taskora_core::error::CoreError;

use crate::error::AppError;

/// Opaque device fingerprint for the requesting client.
///
/// Requests without a `User-Agent` header are rejected with 400 before any
/// credential logic runs.
#[derive(Debug, Clone)]
pub struct DeviceFingerprint(pub String);

impl DeviceFingerprint {
    /// Derive a fingerprint from a raw user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(user_agent.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for DeviceFingerprint {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .filter(|ua| !ua.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation("Missing User-Agent header".into()))
            })?;

        Ok(Self::from_user_agent(user_agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_user_agent_same_fingerprint() {
        let a = DeviceFingerprint::from_user_agent("Mozilla/5.0 (X11; Linux x86_64)");
        let b = DeviceFingerprint::from_user_agent("Mozilla/5.0 (X11; Linux x86_64)");
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn different_user_agents_differ() {
        let a = DeviceFingerprint::from_user_agent("device-a");
        let b = DeviceFingerprint::from_user_agent("device-b");
        assert_ne!(a.0, b.0);
    }
}
