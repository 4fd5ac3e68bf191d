//! Device session model and DTOs.

use sqlx::FromRow;
use taskora_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table.
///
/// At most one row exists per `(user_id, device_fingerprint)` pair; the
/// `refresh_token_hash` is overwritten on every login and rotation.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub device_fingerprint: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for writing a session row (login upsert).
pub struct UpsertSession {
    pub user_id: DbId,
    pub device_fingerprint: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
