/// Access-token codec
///
/// Encodes and validates the short-lived signed credential that proves
/// recent authentication. Tokens are JWTs signed with HS256 and carry only
/// identity and expiry:
///
/// - `sub`: login handle
/// - `iss`: always "taskdeck"
/// - `iat`: issued-at (Unix timestamp)
/// - `exp`: issued-at plus a fixed TTL (10 hours by default)
///
/// No authorization claims are embedded; the request authenticator fetches
/// the role fresh from the credential store on every request. Tokens are
/// never stored server-side, so validity is purely signature plus expiry
/// and there is no revocation short of TTL passage.
///
/// The signing key comes from configuration, not from process startup. All
/// instances sharing the key accept each other's tokens, and a restart does
/// not invalidate outstanding sessions.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::token::TokenCodec;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let codec = TokenCodec::new("a-signing-key-of-at-least-32-bytes!!");
/// let token = codec.issue("user@example.com")?;
///
/// let claims = codec.validate(&token)?;
/// assert_eq!(claims.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into every token
const ISSUER: &str = "taskdeck";

/// Default access-token lifetime
pub const DEFAULT_ACCESS_TTL_HOURS: i64 = 10;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to encode a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    ///
    /// Distinguished from other failures for observability only; callers
    /// surface both uniformly as "unauthenticated".
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, malformed token, or wrong issuer
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account's login handle
    pub sub: String,

    /// Issuer, always "taskdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Checks whether the token has expired at the current time
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Stateless codec for issuing and validating access tokens
///
/// Issuance and validation are pure in-memory computations; the codec is
/// safe to share across request handlers without synchronization.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Creates a codec with the default 10-hour TTL
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(DEFAULT_ACCESS_TTL_HOURS))
    }

    /// Creates a codec with an explicit TTL
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a signed token for the given subject, expiring TTL from now
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issues a token with an explicit TTL
    ///
    /// A non-positive TTL produces an already-expired token, which is how
    /// the tests simulate elapsed time.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token, returning its claims
    ///
    /// Fails closed: any signature, format, or issuer problem is
    /// [`TokenError::Invalid`]; an expired-but-otherwise-valid token is
    /// [`TokenError::Expired`].
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_and_validate() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.issue("user@example.com").unwrap();

        let claims = codec.validate(&token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.iss, "taskdeck");
        assert_eq!(claims.exp - claims.iat, 10 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.issue("user@example.com").unwrap();

        let other = TokenCodec::new("another-secret-key-with-32-bytes!!!!");
        let result = other.validate(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_validate_tampered_token() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.issue("user@example.com").unwrap();

        let mut tampered = token.clone();
        tampered.truncate(token.len() - 4);
        tampered.push_str("AAAA");

        assert!(codec.validate(&tampered).is_err());
        assert!(codec.validate("not-a-jwt").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let codec = TokenCodec::new(SECRET);

        // Negative TTL simulates a token issued more than 10 hours ago
        let token = codec
            .issue_with_ttl("user@example.com", Duration::seconds(-3600))
            .unwrap();

        let result = codec.validate(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_valid_strictly_before_expiry() {
        let codec = TokenCodec::new(SECRET);

        // One second of remaining life still validates
        let token = codec
            .issue_with_ttl("user@example.com", Duration::seconds(2))
            .unwrap();
        assert!(codec.validate(&token).is_ok());
    }

    #[test]
    fn test_custom_ttl() {
        let codec = TokenCodec::with_ttl(SECRET, Duration::hours(1));
        let token = codec.issue("user@example.com").unwrap();
        let claims = codec.validate(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }
}
