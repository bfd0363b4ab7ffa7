/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create a task (admin only)
/// - `GET /v1/tasks/:id` - Fetch a task (admin, or its assignee)
/// - `PATCH /v1/tasks/:id/status` - Change status (admin, or its assignee)
/// - `DELETE /v1/tasks/:id` - Delete a task (admin only)
///
/// Every handler runs the authorization policy before touching the task.
/// For ownership-gated actions the policy is consulted before existence is
/// revealed: a user probing someone else's task (or a nonexistent one) gets
/// the same 403 either way. Admins, who pass the policy unconditionally,
/// get a 404 for missing tasks.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskdeck_shared::auth::policy::{self, TaskAction};
use taskdeck_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
};

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Free-form description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    /// Initial workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Email of the account to assign the task to, if any
    pub assignee_email: Option<String>,
}

/// Update status request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New workflow status
    pub status: TaskStatus,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Deleted task ID
    pub id: String,
}

/// Create a new task
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the assignee email does not
///   resolve to an account
/// - `403 Forbidden`: caller is not an admin
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    // No target resource yet, so the pure decision suffices
    policy::decide(principal.as_ref(), TaskAction::Create, None)?;

    req.validate()?;

    let assignee_id = match req.assignee_email {
        Some(ref email) => {
            let account = state
                .credentials
                .find_by_email(email)
                .await?
                .ok_or_else(|| ApiError::BadRequest("Assignee not found".to_string()))?;
            Some(account.id)
        }
        None => None,
    };

    // A principal passed the policy above, so unwrapping its id is safe,
    // but stay in Result form anyway.
    let author_id = principal
        .as_ref()
        .map(|p| p.account_id)
        .ok_or_else(|| ApiError::Forbidden("Access denied".to_string()))?;

    let task = state
        .tasks
        .create(CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            author_id,
            assignee_id,
        })
        .await?;

    tracing::info!(task_id = %task.id, "task created");
    Ok(Json(task))
}

/// Fetch a task by ID
///
/// # Errors
///
/// - `403 Forbidden`: caller is unauthenticated, or a user who is not the
///   task's assignee (including when the task does not exist)
/// - `404 Not Found`: task does not exist (admins only reach this)
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    policy::authorize(state.tasks.as_ref(), principal.as_ref(), TaskAction::View, id).await?;

    let task = state
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Change a task's workflow status
///
/// # Errors
///
/// - `403 Forbidden`: caller may not act on this task
/// - `404 Not Found`: task does not exist (admins only reach this)
pub async fn update_task_status(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    policy::authorize(
        state.tasks.as_ref(),
        principal.as_ref(),
        TaskAction::UpdateStatus,
        id,
    )
    .await?;

    let task = state
        .tasks
        .update_status(id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %task.id, status = ?task.status, "task status updated");
    Ok(Json(task))
}

/// Delete a task and its comments
///
/// # Errors
///
/// - `403 Forbidden`: caller is not an admin
/// - `404 Not Found`: task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    policy::authorize(
        state.tasks.as_ref(),
        principal.as_ref(),
        TaskAction::Delete,
        id,
    )
    .await?;

    let deleted = state.tasks.delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, "task deleted");
    Ok(Json(DeleteResponse { id: id.to_string() }))
}
