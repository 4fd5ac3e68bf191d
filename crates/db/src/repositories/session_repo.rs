//! Repository for the `sessions` table.
//!
//! All shared session state lives here; concurrent operations on the same
//! `(user, device)` pair are serialized by the database's row-level write
//! path, so no in-process locking exists anywhere in the workspace.

use sqlx::PgPool;
use taskora_core::types::{DbId, Timestamp};

use crate::models::session::{Session, UpsertSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, device_fingerprint, refresh_token_hash, \
                        expires_at, created_at, updated_at";

/// Provides write/lookup operations for device sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert or replace the session row for a `(user, device)` pair.
    ///
    /// Idempotent: a login from a device that already holds a session
    /// overwrites the stored refresh token instead of adding a row.
    pub async fn upsert(pool: &PgPool, input: &UpsertSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (user_id, device_fingerprint, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, device_fingerprint) DO UPDATE SET
                refresh_token_hash = EXCLUDED.refresh_token_hash,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.device_fingerprint)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live session by the presented refresh token's hash.
    ///
    /// Only returns rows that have not expired. A token that was rotated out
    /// no longer matches any row and is therefore absent, even while its
    /// signature is still valid.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE refresh_token_hash = $1
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Compare-and-swap rotation: replace the stored refresh token only if
    /// the presented one is still current.
    ///
    /// Returns `true` when exactly one row was updated. Of two concurrent
    /// refreshes presenting the same token, the loser's `WHERE` clause no
    /// longer matches and it observes `false`.
    pub async fn rotate(
        pool: &PgPool,
        user_id: DbId,
        device_fingerprint: &str,
        presented_hash: &str,
        new_hash: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET
                refresh_token_hash = $4,
                expires_at = $5,
                updated_at = NOW()
             WHERE user_id = $1
               AND device_fingerprint = $2
               AND refresh_token_hash = $3",
        )
        .bind(user_id)
        .bind(device_fingerprint)
        .bind(presented_hash)
        .bind(new_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the session holding the given refresh token hash.
    ///
    /// A no-op (not an error) when the token is already absent, so logout is
    /// safe to call twice. Returns the count of deleted rows.
    pub async fn delete_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE refresh_token_hash = $1")
            .bind(hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
