//! Domain-level error taxonomy.
//!
//! Business-rule failures (`NotFound`, `Conflict`, `Unauthorized`,
//! `Validation`) are expected outcomes returned as typed results; only
//! `Internal` represents an infrastructure fault the caller cannot act on.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The activation link is unknown or was already consumed.
    #[error("Invalid or expired activation link")]
    InvalidActivationLink,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
