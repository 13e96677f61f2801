//! Persistence for users and favorite cities.
//!
//! # Tables
//!
//! - `users` - Accounts with unique email and bcrypt password hash
//! - `favorites` - Saved cities, each referencing its owner in `users`
//!
//! Handlers never see a concrete backend: the application state holds the
//! [`CredentialStore`] and [`FavoriteStore`] traits, backed either by
//! `PostgreSQL` ([`users::PgUserRepository`], [`favorites::PgFavoriteRepository`])
//! or by the in-process [`memory::MemoryStore`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p weather-dashboard-cli -- migrate
//! ```

pub mod favorites;
pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use weather_dashboard_core::{City, Email, UserId};

use crate::models::{Favorite, User};

pub use favorites::PgFavoriteRepository;
pub use memory::MemoryStore;
pub use users::PgUserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage for account credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn create_user(&self, email: &Email, password_hash: &str)
    -> Result<User, RepositoryError>;

    /// Look up a user by exact email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Cheap connectivity check used by the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the backend is unreachable.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Storage for favorite cities.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Save a city for `owner`. Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    async fn create_favorite(
        &self,
        city: &City,
        owner: UserId,
    ) -> Result<Favorite, RepositoryError>;

    /// All favorites saved by `owner`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn list_favorites(&self, owner: UserId) -> Result<Vec<Favorite>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}
