//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required request field was empty or absent.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Email already registered.
    #[error("User already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password, unknown email or empty input).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No bearer token on a protected request.
    #[error("No token provided")]
    MissingToken,

    /// Token failed signature, expiry or scheme checks.
    #[error("Invalid token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token could not be signed.
    #[error("token encoding error: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),
}

impl From<weather_dashboard_core::EmailError> for AuthError {
    fn from(_: weather_dashboard_core::EmailError) -> Self {
        Self::MissingField("email")
    }
}
