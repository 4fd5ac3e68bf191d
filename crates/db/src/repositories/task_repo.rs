//! Repository for the `tasks` table.
//!
//! Every query is scoped by `user_id` so a user can never read or mutate
//! another user's tasks.

use sqlx::PgPool;
use taskora_core::types::DbId;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, is_important, is_urgent, \
                        is_done, deadline, created_at, updated_at";

/// Provides CRUD operations for personal tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task for the given user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (user_id, title, description, is_important, is_urgent, deadline)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_important)
            .bind(input.is_urgent)
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    /// List all tasks for a user, most recently created first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task owned by the given user. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the task does not exist or belongs to another user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                is_important = COALESCE($5, is_important),
                is_urgent = COALESCE($6, is_urgent),
                is_done = COALESCE($7, is_done),
                deadline = COALESCE($8, deadline),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_important)
            .bind(input.is_urgent)
            .bind(input.is_done)
            .bind(input.deadline)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task owned by the given user. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
