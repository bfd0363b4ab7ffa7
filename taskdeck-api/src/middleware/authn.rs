/// Request authenticator
///
/// Runs once per request, ahead of routing. It reads the
/// `Authorization: Bearer <token>` header, validates the access token, and
/// resolves the subject to a [`Principal`] through the credential store.
///
/// The authenticator is deliberately lenient: a missing, malformed,
/// expired, or unresolvable token does NOT reject the request. The request
/// proceeds unauthenticated and the authorization policy decides at the
/// endpoint, so public routes (register, login, refresh) work with or
/// without a header and protected routes fail with 403 rather than 401.
///
/// The role is fetched fresh from the store on every request; a role change
/// takes effect on the next request, not at next login. Tokens carry no
/// authorization claims for the same reason.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use taskdeck_api::app::AppState;
/// use taskdeck_api::middleware::{authenticate, CurrentUser};
///
/// async fn whoami(CurrentUser(principal): CurrentUser) -> String {
///     match principal {
///         Some(p) => p.email,
///         None => "anonymous".to_string(),
///     }
/// }
///
/// fn router(state: AppState) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn_with_state(state.clone(), authenticate))
///         .with_state(state)
/// }
/// ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use taskdeck_shared::auth::policy::Principal;

use crate::app::AppState;

/// The authenticated caller of the current request, if any
///
/// Extractor over the request extension set by [`authenticate`]. `None`
/// means the request carried no usable access token; handlers pass this
/// straight into the authorization policy.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Principal>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts.extensions.get::<Option<Principal>>().cloned().flatten();
        Ok(CurrentUser(principal))
    }
}

/// Authentication middleware
///
/// Attaches `Option<Principal>` to the request extensions and always lets
/// the request through. Validation failures are traced, not surfaced.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = resolve_principal(&state, req.headers()).await;
    req.extensions_mut().insert(principal);
    next.run(req).await
}

async fn resolve_principal(
    state: &AppState,
    headers: &axum::http::HeaderMap,
) -> Option<Principal> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;

    let claims = match state.tokens.validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "access token rejected");
            return None;
        }
    };

    // Subject must still resolve to a live account
    let account = match state.credentials.find_by_email(&claims.sub).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            tracing::debug!(subject = %claims.sub, "token subject has no account");
            return None;
        }
        Err(e) => {
            tracing::error!(error = %e, "credential lookup failed during authentication");
            return None;
        }
    };

    Some(Principal {
        account_id: account.id,
        email: account.email,
        role: account.role,
    })
}
