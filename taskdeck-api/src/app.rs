/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskdeck_api::app::{build_router, AppState};
/// use taskdeck_api::config::Config;
/// use taskdeck_shared::auth::session::SessionManager;
/// use taskdeck_shared::auth::token::TokenCodec;
/// use taskdeck_shared::store::credential::PgCredentialStore;
/// use taskdeck_shared::store::tasks::PgTaskStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = sqlx::PgPool::connect(&config.database.url).await?;
///
/// let credentials = Arc::new(PgCredentialStore::new(pool.clone()));
/// let tasks = Arc::new(PgTaskStore::new(pool));
/// let tokens = Arc::new(TokenCodec::new(&config.auth.jwt_secret));
///
/// let state = AppState::new(credentials, tasks, tokens, false);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use taskdeck_shared::auth::session::SessionManager;
use taskdeck_shared::auth::token::TokenCodec;
use taskdeck_shared::store::credential::CredentialStore;
use taskdeck_shared::store::tasks::TaskStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning. Stores are held behind traits so
/// tests can run the full router over in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    /// Session lifecycle orchestrator (login, refresh, logout, register)
    pub sessions: Arc<SessionManager>,

    /// Account and refresh-token persistence
    pub credentials: Arc<dyn CredentialStore>,

    /// Task and comment persistence
    pub tasks: Arc<dyn TaskStore>,

    /// Access-token codec
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: Arc<TokenCodec>,
        rotate_refresh_tokens: bool,
    ) -> Self {
        let sessions = Arc::new(
            SessionManager::new(credentials.clone(), tokens.clone())
                .with_rotation(rotate_refresh_tokens),
        );

        Self {
            sessions,
            credentials,
            tasks,
            tokens,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1 (versioned)
///     ├── /auth/
///     │   ├── POST /register        # Public
///     │   ├── POST /login           # Public
///     │   ├── POST /refresh         # Public
///     │   └── POST /logout          # Requires a principal
///     └── /tasks/
///         ├── POST   /              # Admin only
///         ├── GET    /:id           # Admin or assignee
///         ├── DELETE /:id           # Admin only
///         ├── PATCH  /:id/status    # Admin or assignee
///         ├── GET    /:id/comments  # Admin or assignee
///         └── POST   /:id/comments  # Admin or assignee
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (every route; resolves an optional principal and
///    never rejects — authorization happens at the endpoints)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Session lifecycle; logout checks the principal in its handler
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/logout", post(routes::auth::logout));

    // Protected task surface; every handler runs the policy itself
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", axum::routing::delete(routes::tasks::delete_task))
        .route("/:id/status", patch(routes::tasks::update_task_status))
        .route("/:id/comments", get(routes::comments::list_comments))
        .route("/:id/comments", post(routes::comments::create_comment));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::authenticate,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

