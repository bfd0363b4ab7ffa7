/// Authentication and authorization for Taskdeck
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Signed access-token codec (HS256, fixed TTL)
/// - [`session`]: Login, refresh, logout, and registration over the
///   credential store
/// - [`policy`]: Role-plus-ownership authorization decisions
///
/// # Design notes
///
/// Access tokens are stateless: validity is signature plus expiry, nothing
/// is stored server-side, and there is no revocation list. Logout and role
/// changes therefore do not invalidate outstanding access tokens until
/// their TTL passes; they only invalidate the refresh token. The signing
/// key is an explicit configuration input so that horizontally scaled
/// instances share one key and restarts keep sessions alive.

pub mod password;
pub mod policy;
pub mod session;
pub mod token;
