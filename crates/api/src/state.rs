use std::sync::Arc;

use taskora_events::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: taskora_db::DbPool,
    /// Server configuration, loaded once at startup and never mutated.
    pub config: Arc<ServerConfig>,
    /// Fire-and-forget outbound mail queue.
    pub mailer: Mailer,
}
