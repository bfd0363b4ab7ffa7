/// Credential store
///
/// The credential store is the only shared mutable resource of the auth
/// subsystem. It persists accounts and the single-slot refresh token and is
/// consumed exclusively through the [`CredentialStore`] trait.
///
/// # Concurrency
///
/// `set_refresh_token` must be atomic with respect to concurrent
/// login/refresh/logout for the same account: after two concurrent logins
/// the store references exactly one of the two generated tokens, and only
/// that one refreshes. The Postgres implementation relies on a
/// single-statement row update; the in-memory implementation
/// ([`super::memory::MemoryCredentialStore`]) serializes writes behind a
/// mutex.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::store::credential::{CredentialStore, PgCredentialStore};
/// use taskdeck_shared::models::account::{CreateAccount, Role};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgCredentialStore::new(pool);
///
/// let account = store
///     .insert(CreateAccount {
///         email: "user@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         role: Role::User,
///     })
///     .await?;
///
/// let found = store.find_by_email("user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreError;
use crate::models::account::{Account, CreateAccount};

/// Narrow persistence interface for accounts and refresh tokens
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds an account by its login handle
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Finds the account currently holding the given refresh token
    ///
    /// Returns `None` when no account holds this value, which is the
    /// definition of an invalid refresh token.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>, StoreError>;

    /// Creates a new account
    ///
    /// Fails with [`StoreError::Duplicate`] when the email is already taken.
    async fn insert(&self, data: CreateAccount) -> Result<Account, StoreError>;

    /// Replaces the stored refresh token for an account
    ///
    /// `None` clears the slot (logout). Returns `false` when the account
    /// does not exist.
    async fn set_refresh_token(
        &self,
        account_id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, StoreError>;
}

/// Postgres-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Creates a new store over an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, refresh_token, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, refresh_token, created_at, updated_at
            FROM accounts
            WHERE refresh_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, data: CreateAccount) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, refresh_token, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    async fn set_refresh_token(
        &self,
        account_id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, StoreError> {
        // Single statement keeps the slot update atomic under concurrent
        // logins for the same account.
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET refresh_token = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
