use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::tasks::repo_types::{NewTask, Task, TaskPatch, TaskRow};

/// Persistence for tasks. Every method is scoped to the owning user and only
/// ever sees active (not soft-deleted) tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, new: NewTask) -> anyhow::Result<Task>;

    async fn count_active(&self, user_id: Uuid) -> anyhow::Result<i64>;

    /// Newest first; ties on `created_at` resolve by insertion order.
    async fn list_active(&self, user_id: Uuid, limit: i64, offset: i64)
        -> anyhow::Result<Vec<Task>>;

    /// Applies `patch` to an active task owned by `user_id`. `None` if no such task.
    async fn update_active(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> anyhow::Result<Option<Task>>;

    /// Marks an active task owned by `user_id` as deleted. `false` if no such task.
    async fn soft_delete(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, user_id: Uuid, new: NewTask) -> anyhow::Result<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (user_id, title, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, status, created_at, deleted_at
            "#,
        )
        .bind(user_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.status)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn count_active(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE user_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(total)
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, status, created_at, deleted_at
            FROM tasks
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, seq DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn update_active(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> anyhow::Result<Option<Task>> {
        // COALESCE reads the current value at write time, so concurrent patches
        // on different fields don't clobber each other.
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
               SET title = COALESCE($3, title),
                   description = COALESCE($4, description),
                   status = COALESCE($5, status)
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING id, user_id, title, description, status, created_at, deleted_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.status)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Task::from))
    }

    async fn soft_delete(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE tasks
               SET deleted_at = now()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
