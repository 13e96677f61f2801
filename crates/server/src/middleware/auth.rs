//! Bearer token middleware and the `CurrentUser` extractor.
//!
//! Protected routes are wrapped with [`require_bearer_token`], which verifies the
//! `Authorization: Bearer <token>` header and stores the caller's id in request
//! extensions. Handlers then take a [`CurrentUser`] argument.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::Span;

use weather_dashboard_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::services::AuthError;
use crate::state::AppState;

/// The authenticated caller, set by [`require_bearer_token`].
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(CurrentUser(user_id): CurrentUser) -> String {
///     format!("Hello, user {user_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Pull the token out of an `Authorization` header value.
///
/// A blank value or a bare scheme carries no token. The scheme matches
/// `Bearer` case-insensitively; any other scheme is rejected as invalid.
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();

    let Some(scheme) = parts.next() else {
        return Err(AuthError::MissingToken);
    };
    let Some(token) = parts.next() else {
        return Err(AuthError::MissingToken);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") || parts.next().is_some() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token)
}

/// Middleware that rejects requests without a valid bearer token.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` if no token is present and
/// `AuthError::InvalidToken` if it fails verification.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match request.headers().get(AUTHORIZATION) {
        None => return Err(AuthError::MissingToken.into()),
        Some(value) => value.to_str().map_err(|_| AuthError::InvalidToken)?,
    };

    let user_id = bearer_token(header)
        .and_then(|token| state.auth().verify(token))
        .inspect_err(|e| tracing::warn!(error = %e, "bearer token rejected"))?;

    Span::current().record("user_id", user_id.as_i32());
    set_sentry_user(&user_id);

    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or(AppError::Auth(AuthError::MissingToken))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extracts_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("bearer abc").unwrap(), "abc");
        assert_eq!(bearer_token("BEARER abc").unwrap(), "abc");
        assert_eq!(bearer_token("bEaReR abc").unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_missing_token_part() {
        assert!(matches!(bearer_token(""), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token("Bearer"), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token("Bearer   "), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        assert!(matches!(
            bearer_token("Basic dXNlcjpwdw=="),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            bearer_token("Token abc"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            bearer_token("Bearers abc"),
            Err(AuthError::InvalidToken)
        ));
    }
}
