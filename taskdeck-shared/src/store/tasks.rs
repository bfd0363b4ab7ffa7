/// Task store
///
/// Task persistence consumed by the API handlers and, through
/// `assignee_email`, by the authorization policy's ownership predicate.
/// Only the operations the policy table names are exposed; the wider CRUD
/// surface of a task tracker is out of scope here.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreError;
use crate::models::comment::{Comment, CreateComment};
use crate::models::task::{CreateTask, Task, TaskStatus};

/// Narrow persistence interface for tasks and comments
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Finds a task by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Resolves the login handle of a task's assignee
    ///
    /// Returns `None` when the task does not exist or has no assignee. The
    /// policy treats both the same way, so a denial never reveals whether
    /// the task exists.
    async fn assignee_email(&self, task_id: Uuid) -> Result<Option<String>, StoreError>;

    /// Creates a new task
    async fn create(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Updates a task's status, returning the updated task
    async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError>;

    /// Deletes a task (comments cascade)
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Attaches a comment to a task
    async fn create_comment(&self, data: CreateComment) -> Result<Comment, StoreError>;

    /// Lists a task's comments, oldest first
    async fn comments_for_task(
        &self,
        task_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StoreError>;
}

/// Postgres-backed task store
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Creates a new store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, author_id, assignee_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn assignee_email(&self, task_id: Uuid) -> Result<Option<String>, StoreError> {
        let email: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT a.email
            FROM tasks t
            JOIN accounts a ON a.id = t.assignee_id
            WHERE t.id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(email.map(|(e,)| e))
    }

    async fn create(&self, data: CreateTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, author_id, assignee_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, status, priority, author_id, assignee_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.author_id)
        .bind(data.assignee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, priority, author_id, assignee_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, data: CreateComment) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, author_id, content, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.author_id)
        .bind(data.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn comments_for_task(
        &self,
        task_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, task_id, author_id, content, created_at
            FROM comments
            WHERE task_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(task_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
