/// Shared test fixtures for API integration tests
///
/// Builds the full router over the in-memory stores, so the suite
/// exercises routing, the request authenticator, the authorization policy,
/// and the session manager without a database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::Service as _;

use taskdeck_api::app::{build_router, AppState};
use taskdeck_shared::auth::token::TokenCodec;
use taskdeck_shared::store::memory::{MemoryCredentialStore, MemoryTaskStore};

/// Signing key used across every test
pub const TEST_SECRET: &str = "integration-test-secret-32-bytes!!!!";

/// Password of the seeded admin
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Handle of the seeded admin
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Everything a test needs to drive the API
pub struct TestContext {
    /// The complete router, as served in production
    pub app: Router,

    /// Concrete task store, for seeding assignee handles
    pub tasks: Arc<MemoryTaskStore>,

    /// Application state, for direct access to the session manager
    pub state: AppState,
}

impl TestContext {
    /// Builds a fresh context with a seeded admin account
    pub async fn new() -> Self {
        Self::with_rotation(false).await
    }

    /// Builds a context with refresh-token rotation enabled
    pub async fn with_rotation(rotate: bool) -> Self {
        let credentials = Arc::new(MemoryCredentialStore::new());
        let tasks = Arc::new(MemoryTaskStore::new());
        let tokens = Arc::new(TokenCodec::new(TEST_SECRET));

        let state = AppState::new(credentials, tasks.clone(), tokens, rotate);

        state
            .sessions
            .seed_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap();

        let app = build_router(state.clone());

        Self { app, tasks, state }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// POSTs a JSON body, optionally authenticated
    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// PATCHes a JSON body, optionally authenticated
    pub async fn patch_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// GETs a resource, optionally authenticated
    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// DELETEs a resource, optionally authenticated
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Registers a user account
    pub async fn register(&self, email: &str, password: &str) {
        let response = self
            .post_json(
                "/v1/auth/register",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Logs in, returning (access_token, refresh_token)
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post_json(
                "/v1/auth/login",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    /// Registers and logs in a user in one step
    pub async fn register_and_login(&self, email: &str, password: &str) -> (String, String) {
        self.register(email, password).await;
        self.login(email, password).await
    }

    /// Logs in as the seeded admin
    pub async fn admin_login(&self) -> (String, String) {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Creates a task through the API as admin, assigned to `assignee_email`
    ///
    /// Registers the assignee handle with the in-memory store so ownership
    /// checks resolve the way the accounts join does in Postgres.
    pub async fn create_task_for(&self, admin_token: &str, assignee_email: &str) -> Value {
        let response = self
            .post_json(
                "/v1/tasks",
                Some(admin_token),
                serde_json::json!({
                    "title": "Fix the flaky deploy",
                    "description": "Deploys fail one time in five",
                    "status": "pending",
                    "priority": "high",
                    "assignee_email": assignee_email,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let task = body_json(response).await;
        let task_id = task["id"].as_str().unwrap().parse().unwrap();
        self.tasks.set_assignee_email(task_id, assignee_email);
        task
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
