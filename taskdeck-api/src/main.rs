//! # TaskDeck API Server
//!
//! HTTP API for the TaskDeck task tracker: account registration, JWT-based
//! session management with single-slot refresh tokens, and a role- and
//! ownership-gated task/comment surface.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskdeck-api
//! ```

use std::sync::Arc;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::auth::token::TokenCodec;
use taskdeck_shared::db::{migrations, pool, pool::DatabaseConfig};
use taskdeck_shared::store::credential::PgCredentialStore;
use taskdeck_shared::store::tasks::PgTaskStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskDeck API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    migrations::run_migrations(&db).await?;

    let credentials = Arc::new(PgCredentialStore::new(db.clone()));
    let tasks = Arc::new(PgTaskStore::new(db));
    let tokens = Arc::new(TokenCodec::with_ttl(
        &config.auth.jwt_secret,
        chrono::Duration::hours(config.auth.access_token_ttl_hours),
    ));

    let state = AppState::new(
        credentials,
        tasks,
        tokens,
        config.auth.rotate_refresh_tokens,
    );

    // Seed the bootstrap admin when a password is configured
    match config.auth.admin_password {
        Some(ref password) => {
            state
                .sessions
                .seed_admin(&config.auth.admin_email, password)
                .await?;
        }
        None => {
            tracing::warn!("ADMIN_PASSWORD not set, skipping admin seeding");
        }
    }

    let app = build_router(state);

    let addr = config.bind_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
