/// Request-level middleware
pub mod authn;

pub use authn::{authenticate, CurrentUser};
