/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `JWT_SECRET`: Access-token signing key, at least 32 bytes (required).
///   Shared across instances so they accept each other's tokens; generate
///   with `openssl rand -hex 32`.
/// - `ACCESS_TOKEN_TTL_HOURS`: Access-token lifetime (default: 10)
/// - `ROTATE_REFRESH_TOKENS`: Enable rotate-on-use hardening (default: false)
/// - `ADMIN_EMAIL`: Handle of the seeded admin (default: admin@example.com)
/// - `ADMIN_PASSWORD`: Password of the seeded admin; seeding is skipped
///   when unset
/// - `RUST_LOG`: Log level (default: info)

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access-token signing key
    ///
    /// Must be kept secret and be at least 32 bytes.
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Access-token lifetime in hours
    pub access_token_ttl_hours: i64,

    /// Whether refresh tokens rotate on use
    pub rotate_refresh_tokens: bool,

    /// Seeded admin handle
    pub admin_email: String,

    /// Seeded admin password; `None` skips seeding
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let access_token_ttl_hours = env::var("ACCESS_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<i64>()?;

        let rotate_refresh_tokens = env::var("ROTATE_REFRESH_TOKENS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                access_token_ttl_hours,
                rotate_refresh_tokens,
                admin_email,
                admin_password,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
