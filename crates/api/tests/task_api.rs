//! HTTP-level integration tests for the `/tasks` API endpoints.
//!
//! Every task route requires a Bearer access token; tokens are obtained by
//! registering and logging in through the auth API.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get, get_auth, post_json, post_json_auth,
    put_json_auth,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register and log in a user, returning their access token.
async fn access_token_for(pool: &PgPool, email: &str) -> String {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/register",
        serde_json::json!({ "email": email, "password": "correct-horse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        serde_json::json!({ "login": email, "password": "correct-horse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_task(pool: &PgPool, token: &str, title: &str) -> serde_json::Value {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tasks",
        serde_json::json!({ "title": title }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Test: task routes reject unauthenticated requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tasks_require_auth(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/tasks").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/tasks",
        "garbage-token",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: create, list, update, delete round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_crud_flow(pool: PgPool) {
    let token = access_token_for(&pool, "alice@example.com").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tasks",
        serde_json::json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "is_important": true
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await;
    assert_eq!(task["title"], "Write report");
    assert_eq!(task["is_important"], true);
    assert_eq!(task["is_done"], false);
    let id = task["id"].as_i64().unwrap();

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/tasks", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}"),
        serde_json::json!({ "is_done": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    assert_eq!(task["is_done"], true);
    assert_eq!(task["title"], "Write report", "untouched fields survive");

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/tasks", &token).await;
    let list = body_json(response).await;
    assert!(list.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: creating a task with an empty title fails validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_empty_title_rejected(pool: PgPool) {
    let token = access_token_for(&pool, "alice@example.com").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tasks",
        serde_json::json!({ "title": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: users cannot see or touch each other's tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_tasks_are_scoped_per_user(pool: PgPool) {
    let alice = access_token_for(&pool, "alice@example.com").await;
    let bob = access_token_for(&pool, "bob@example.com").await;

    let task = create_task(&pool, &alice, "Alice's task").await;
    let id = task["id"].as_i64().unwrap();

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/tasks", &bob).await;
    let list = body_json(response).await;
    assert!(list.as_array().unwrap().is_empty());

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}"),
        serde_json::json!({ "title": "hijacked" }),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{id}"),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice's task is untouched.
    let response = get_auth(build_test_app(pool.clone()), "/api/v1/tasks", &alice).await;
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Alice's task");
}

// ---------------------------------------------------------------------------
// Test: updating or deleting a missing task returns 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_not_found(pool: PgPool) {
    let token = access_token_for(&pool, "alice@example.com").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tasks/9999",
        serde_json::json!({ "is_done": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(build_test_app(pool.clone()), "/api/v1/tasks/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
