pub mod auth;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register              register (public)
/// /auth/login                 login (public, requires User-Agent)
/// /auth/refresh               refresh (cookie + User-Agent)
/// /auth/logout                logout (cookie + User-Agent)
/// /auth/activate/{link}       consume activation link (public)
///
/// /tasks                      list, create (requires auth)
/// /tasks/{id}                 update, delete (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tasks", tasks::router())
}
