/// Session manager
///
/// Orchestrates the credential lifecycle over the [`CredentialStore`]:
///
/// - `register`: hash the password, persist a `User` account
/// - `login`: verify the password, rotate the single-slot refresh token,
///   issue an access token
/// - `refresh`: exchange a live refresh token for a new access token
/// - `logout`: clear the refresh token, ending the refreshable session
///
/// An account is implicitly "authenticated" while its refresh-token slot is
/// occupied and "anonymous" otherwise; no explicit status field exists.
/// Logging in overwrites any previous refresh token, so there is no
/// concurrent-session support: the newest login wins.
///
/// Logout cannot invalidate already-issued access tokens; they remain valid
/// until their TTL passes (stateless-token trade-off, see [`crate::auth`]).

use std::sync::Arc;

use uuid::Uuid;

use super::password::{
    hash_password, validate_password_strength, verify_password, PasswordError,
};
use super::token::{TokenCodec, TokenError};
use crate::models::account::{Account, CreateAccount, Role};
use crate::store::credential::CredentialStore;
use crate::store::StoreError;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Unknown handle or wrong password at login
    ///
    /// The two causes are deliberately collapsed: callers must not be able
    /// to probe which handles exist.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with a handle that already exists
    #[error("Email already exists")]
    EmailTaken,

    /// Logout (or admin seeding) referenced a handle with no account
    #[error("Account not found")]
    UnknownAccount,

    /// Refresh token is not currently held by any account
    #[error("Refresh token not recognized")]
    RefreshTokenNotFound,

    /// Registration password failed the strength check
    #[error("{0}")]
    WeakPassword(String),

    /// Password hashing/verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token issuance failed
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Credential store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Token pair returned by a successful login
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// Short-lived signed access token
    pub access_token: String,

    /// Opaque refresh token now stored on the account
    pub refresh_token: String,
}

/// Result of a successful refresh
#[derive(Debug, Clone)]
pub struct RefreshedSession {
    /// Fresh access token for the token holder's handle
    pub access_token: String,

    /// Replacement refresh token, present only when rotate-on-use is
    /// enabled; the old token is then invalid
    pub refresh_token: Option<String>,
}

/// Orchestrates login, refresh, logout, and registration
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenCodec>,
    rotate_on_use: bool,
}

impl SessionManager {
    /// Creates a session manager with refresh-token rotation disabled
    /// (reference behavior: refresh is idempotent)
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenCodec>) -> Self {
        Self {
            store,
            tokens,
            rotate_on_use: false,
        }
    }

    /// Enables rotate-on-use hardening: every refresh invalidates the
    /// presented token and returns a replacement
    pub fn with_rotation(mut self, rotate_on_use: bool) -> Self {
        self.rotate_on_use = rotate_on_use;
        self
    }

    /// Registers a new `User` account
    ///
    /// # Errors
    ///
    /// [`SessionError::EmailTaken`] when the handle is already registered;
    /// [`SessionError::WeakPassword`] when the password fails the strength
    /// check. Strength is enforced here, not just at the HTTP boundary, so
    /// every caller of the session layer gets the same rule.
    pub async fn register(&self, email: &str, password: &str) -> Result<Account, SessionError> {
        validate_password_strength(password).map_err(SessionError::WeakPassword)?;

        let password_hash = hash_password(password)?;

        let account = self
            .store
            .insert(CreateAccount {
                email: email.to_string(),
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => SessionError::EmailTaken,
                other => SessionError::Store(other),
            })?;

        tracing::info!(email = %account.email, "account registered");
        Ok(account)
    }

    /// Authenticates a handle/password pair and opens a session
    ///
    /// On success a freshly generated refresh token overwrites whatever the
    /// account's slot held, invalidating any previous session.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentials`] for an unknown handle or a
    /// wrong password, indistinguishably.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, SessionError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(SessionError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            return Err(SessionError::InvalidCredentials);
        }

        let refresh_token = generate_refresh_token();
        self.store
            .set_refresh_token(account.id, Some(&refresh_token))
            .await?;

        let access_token = self.tokens.issue(&account.email)?;

        tracing::info!(email = %account.email, "login succeeded");
        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a new access token
    ///
    /// Succeeds if and only if the presented value is the one currently
    /// stored on some account. With rotation enabled the slot is replaced
    /// and the new value returned.
    ///
    /// # Errors
    ///
    /// [`SessionError::RefreshTokenNotFound`] when no account holds the
    /// token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedSession, SessionError> {
        let account = self
            .store
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or(SessionError::RefreshTokenNotFound)?;

        let access_token = self.tokens.issue(&account.email)?;

        let rotated = if self.rotate_on_use {
            let next = generate_refresh_token();
            self.store
                .set_refresh_token(account.id, Some(&next))
                .await?;
            Some(next)
        } else {
            None
        };

        Ok(RefreshedSession {
            access_token,
            refresh_token: rotated,
        })
    }

    /// Ends the refreshable session for a handle
    ///
    /// Clears the stored refresh token; previously issued refresh tokens
    /// for this account become permanently invalid. Already-issued access
    /// tokens are unaffected until they expire.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownAccount`] when no account has this handle.
    pub async fn logout(&self, email: &str) -> Result<(), SessionError> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(SessionError::UnknownAccount)?;

        self.store.set_refresh_token(account.id, None).await?;

        tracing::info!(email = %account.email, "logged out");
        Ok(())
    }

    /// Idempotently creates the seeded `Admin` account at bootstrap
    ///
    /// Does nothing when the handle already exists; concurrent seeding by
    /// multiple instances is harmless. The configured password must pass
    /// the same strength check as registration.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<(), SessionError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        validate_password_strength(password).map_err(SessionError::WeakPassword)?;

        let password_hash = hash_password(password)?;
        let result = self
            .store
            .insert(CreateAccount {
                email: email.to_string(),
                password_hash,
                role: Role::Admin,
            })
            .await;

        match result {
            Ok(account) => {
                tracing::info!(email = %account.email, "seeded admin account");
                Ok(())
            }
            // Another instance won the race; the admin exists either way
            Err(StoreError::Duplicate(_)) => Ok(()),
            Err(e) => Err(SessionError::Store(e)),
        }
    }
}

/// Generates a new opaque refresh token
fn generate_refresh_token() -> String {
    Uuid::new_v4().to_string()
}
