//! Authentication service.
//!
//! Registers users with bcrypt-hashed passwords, checks login attempts and
//! issues the bearer tokens that guard the favorites API.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, IssuedToken, TokenIssuer};

use std::sync::Arc;

use tokio::sync::OnceCell;

use weather_dashboard_core::{Email, UserId};

use crate::config::AuthConfig;
use crate::db::{CredentialStore, RepositoryError};
use crate::models::User;

/// Password hashed for unknown-email logins so they cost the same as a
/// wrong password.
const DUMMY_PASSWORD: &str = "weather-dashboard-unknown-account";

/// Authentication service.
///
/// Cheap to clone; the credential store is shared.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(users: Arc<dyn CredentialStore>, config: &AuthConfig) -> Self {
        Self {
            users,
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl),
            bcrypt_cost: config.bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if either field is empty.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let password_hash = hash_password(password.to_owned(), self.bcrypt_cost).await?;

        let user = self
            .users
            .create_user(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong,
    /// whichever of the two it is.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            let dummy = self.dummy_hash().await?;
            verify_password(password.to_owned(), dummy.to_owned()).await?;
            tracing::warn!("login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password.to_owned(), user.password_hash.clone()).await? {
            tracing::warn!(user_id = %user.id, "login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "token issued");
        Ok(issued)
    }

    /// Verify a bearer token and return the user it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is forged, malformed or expired.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens.verify(token).map(|claims| claims.user_id)
    }

    /// Hash compared against when the email is unknown, at the configured cost.
    async fn dummy_hash(&self) -> Result<&str, AuthError> {
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD.to_owned(), self.bcrypt_cost))
            .await
            .map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) const fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}

/// Hash a password with bcrypt on the blocking pool.
async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| AuthError::PasswordHash)?
        .map_err(|_| AuthError::PasswordHash)
}

/// Compare a password against a stored hash on the blocking pool.
///
/// A hash that cannot be parsed counts as a mismatch.
async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    #[cfg(test)]
    VERIFY_CALLS.with(|calls| calls.set(calls.get() + 1));

    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| AuthError::PasswordHash)?;

    Ok(verified.unwrap_or(false))
}

#[cfg(test)]
thread_local! {
    /// Per-thread count of password comparisons.
    static VERIFY_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}
