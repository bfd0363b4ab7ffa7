/// API error types and HTTP response conversion
///
/// Every handler returns `Result<_, ApiError>`, and the `IntoResponse`
/// implementation maps each variant to a status code and a JSON body of
/// the form `{"error": "..."}`. Internal details are logged, never
/// surfaced to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskdeck_shared::auth::policy::PolicyError;
use taskdeck_shared::auth::session::SessionError;
use taskdeck_shared::store::StoreError;

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Request was malformed or semantically invalid (400)
    BadRequest(String),

    /// The caller is not allowed, or not authenticated at all (403)
    ///
    /// There is no 401 variant: the request authenticator never rejects,
    /// so every authentication shortfall surfaces as a policy denial.
    Forbidden(String),

    /// Resource not found (404)
    NotFound(String),

    /// Request body failed validation (400)
    ValidationError(String),

    /// Unexpected server-side failure (500)
    InternalError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                // Log the real error, return a generic message
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials
            | SessionError::EmailTaken
            | SessionError::UnknownAccount
            | SessionError::WeakPassword(_) => ApiError::BadRequest(err.to_string()),
            // An unrecognized refresh token is a forbidden replay, not a
            // client formatting mistake.
            SessionError::RefreshTokenNotFound => ApiError::Forbidden(err.to_string()),
            SessionError::Password(err) => ApiError::InternalError(err.to_string()),
            SessionError::Token(err) => ApiError::InternalError(err.to_string()),
            SessionError::Store(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Denied => ApiError::Forbidden(err.to_string()),
            PolicyError::Store(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => ApiError::BadRequest(msg),
            StoreError::Database(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}
