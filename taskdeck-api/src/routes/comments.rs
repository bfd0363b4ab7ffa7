/// Comment endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks/:id/comments` - List a task's comments (admin, or its assignee)
/// - `POST /v1/tasks/:id/comments` - Comment on a task (admin, or its assignee)
///
/// Commenting rights follow the task, not the comment: whoever may view a
/// task may read and write its comments.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskdeck_shared::auth::policy::{self, TaskAction};
use taskdeck_shared::models::comment::{Comment, CreateComment};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
};

/// Default page size for comment listings
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum page size for comment listings
const MAX_PAGE_SIZE: i64 = 200;

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment body
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Pagination parameters for comment listings
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    /// Maximum number of comments to return
    pub limit: Option<i64>,

    /// Number of comments to skip
    pub offset: Option<i64>,
}

/// Comment listing response
#[derive(Debug, Serialize)]
pub struct ListCommentsResponse {
    /// Comments, oldest first
    pub comments: Vec<Comment>,
}

/// Attach a comment to a task
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `403 Forbidden`: caller may not act on this task
/// - `404 Not Found`: task does not exist (admins only reach this)
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    policy::authorize(
        state.tasks.as_ref(),
        principal.as_ref(),
        TaskAction::Comment,
        task_id,
    )
    .await?;

    req.validate()?;

    // Only admins can get past the policy for a missing task; confirm
    // existence before inserting.
    if state.tasks.find_by_id(task_id).await?.is_none() {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    let author_id = principal
        .as_ref()
        .map(|p| p.account_id)
        .ok_or_else(|| ApiError::Forbidden("Access denied".to_string()))?;

    let comment = state
        .tasks
        .create_comment(CreateComment {
            task_id,
            author_id,
            content: req.content,
        })
        .await?;

    tracing::info!(task_id = %task_id, comment_id = %comment.id, "comment created");
    Ok(Json(comment))
}

/// List a task's comments, oldest first
///
/// # Errors
///
/// - `403 Forbidden`: caller may not act on this task
/// - `404 Not Found`: task does not exist (admins only reach this)
pub async fn list_comments(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(task_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> ApiResult<Json<ListCommentsResponse>> {
    policy::authorize(
        state.tasks.as_ref(),
        principal.as_ref(),
        TaskAction::ListComments,
        task_id,
    )
    .await?;

    if state.tasks.find_by_id(task_id).await?.is_none() {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let comments = state
        .tasks
        .comments_for_task(task_id, limit, offset)
        .await?;

    Ok(Json(ListCommentsResponse { comments }))
}
