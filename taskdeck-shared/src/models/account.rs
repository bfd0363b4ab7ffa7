/// Account model
///
/// An account is the unit of authentication: a unique email handle, an
/// Argon2id password hash, a role, and at most one live refresh token.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('admin', 'user');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role account_role NOT NULL DEFAULT 'user',
///     refresh_token VARCHAR(64) UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Invariants
///
/// - `email` is globally unique.
/// - `refresh_token`, when present, is unique across accounts: a token value
///   identifies exactly one account (single-slot storage model).
/// - Accounts are never deleted by the auth subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
///
/// Roles are an explicit enumeration evaluated by the authorization policy;
/// there is no dynamic role dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every operation
    Admin,

    /// Access gated by resource ownership
    User,
}

impl Role {
    /// Converts role to string for logs and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Account model representing an authenticated identity
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The
/// `refresh_token` field holds the only currently valid refresh token for
/// this account; issuing a new one invalidates the previous value.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Login handle, unique across all accounts
    pub email: String,

    /// Argon2id password hash (PHC string format)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Currently valid refresh token, if any
    ///
    /// `None` means the account has no live session to refresh.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccount {
    /// Login handle (must be unique)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Role for the new account
    ///
    /// Registration always passes `Role::User`; only the bootstrap seeding
    /// path creates an `Admin`.
    pub role: Role,
}
