/// Session lifecycle endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user account
/// - `POST /v1/auth/login` - Authenticate and open a session
/// - `POST /v1/auth/refresh` - Exchange a refresh token for a new access token
/// - `POST /v1/auth/logout` - End the caller's refreshable session
///
/// Register, login, and refresh are public. Logout requires a principal:
/// the session it ends is the caller's own, taken from the validated access
/// token, never from the request body.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address, used as the login handle
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New account ID
    pub account_id: String,

    /// Login handle
    pub email: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (10h)
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token obtained at login
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (10h)
    pub access_token: String,

    /// Replacement refresh token, present only when rotation is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Register a new user account
///
/// New accounts always get the `User` role; there is no self-service path
/// to `Admin`. Registration does not log the account in.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate()?;

    let account = state.sessions.register(&req.email, &req.password).await?;

    Ok(Json(RegisterResponse {
        account_id: account.id.to_string(),
        email: account.email,
    }))
}

/// Login and open a session
///
/// A successful login overwrites the account's stored refresh token, so at
/// most one refreshable session exists per account.
///
/// # Errors
///
/// - `400 Bad Request`: unknown email or wrong password, reported
///   identically
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let tokens = state.sessions.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// Exchange a refresh token for a new access token
///
/// # Errors
///
/// - `403 Forbidden`: the token is not currently held by any account
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let session = state.sessions.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// End the caller's refreshable session
///
/// Clears the refresh-token slot of the authenticated account. Outstanding
/// access tokens stay valid until they expire.
///
/// # Errors
///
/// - `403 Forbidden`: no valid access token on the request
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let principal = principal.ok_or_else(|| ApiError::Forbidden("Access denied".to_string()))?;

    state.sessions.logout(&principal.email).await?;

    Ok(Json(serde_json::json!({ "message": "Logged out" })))
}
