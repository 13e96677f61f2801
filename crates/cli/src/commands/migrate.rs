//! Database migration commands.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (falls back to `MONGODB_URL`)
//!
//! # Migration Files
//!
//! Migrations are embedded from `crates/server/migrations/` at build time.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::migrate::Migrator;

static MIGRATOR: Migrator = sqlx::migrate!("../server/migrations");

/// SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// Errors from the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL, preferring `DATABASE_URL`.
fn database_url<F>(lookup: F) -> Result<SecretString, MigrationError>
where
    F: Fn(&str) -> Option<String>,
{
    ["DATABASE_URL", "MONGODB_URL"]
        .into_iter()
        .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
        .map(SecretString::from)
        .ok_or(MigrationError::MissingEnvVar("DATABASE_URL"))
}

/// Versions already applied, or none if the bookkeeping table does not exist yet.
fn applied_versions(result: Result<Vec<i64>, sqlx::Error>) -> Result<Vec<i64>, MigrationError> {
    match result {
        Ok(versions) => Ok(versions),
        Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some(UNDEFINED_TABLE) => {
            Ok(Vec::new())
        }
        Err(err) => Err(err.into()),
    }
}

async fn connect() -> Result<PgPool, MigrationError> {
    let _ = dotenvy::dotenv();

    let url = database_url(|key| std::env::var(key).ok())?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(url.expose_secret()).await?)
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

/// Log which embedded migrations have been applied.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or the applied
/// versions cannot be read.
pub async fn status() -> Result<(), MigrationError> {
    let pool = connect().await?;

    let applied = applied_versions(
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations")
            .fetch_all(&pool)
            .await,
    )?;

    for migration in MIGRATOR.iter() {
        let state = if applied.contains(&migration.version) {
            "applied"
        } else {
            "pending"
        };
        tracing::info!(
            version = migration.version,
            description = %migration.description,
            "{state}"
        );
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_prefers_primary() {
        let url = database_url(|key| match key {
            "DATABASE_URL" => Some("postgres://primary".to_owned()),
            "MONGODB_URL" => Some("postgres://fallback".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://primary");
    }

    #[test]
    fn test_database_url_falls_back() {
        let url = database_url(|key| match key {
            "DATABASE_URL" => Some(String::new()),
            "MONGODB_URL" => Some("postgres://fallback".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://fallback");
    }

    #[test]
    fn test_database_url_missing() {
        assert!(matches!(
            database_url(|_| None),
            Err(MigrationError::MissingEnvVar("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_applied_versions_pass_through() {
        assert_eq!(applied_versions(Ok(vec![1, 2])).unwrap(), [1, 2]);
    }

    #[test]
    fn test_applied_versions_surface_query_errors() {
        assert!(matches!(
            applied_versions(Err(sqlx::Error::PoolTimedOut)),
            Err(MigrationError::Database(sqlx::Error::PoolTimedOut))
        ));
        assert!(matches!(
            applied_versions(Err(sqlx::Error::RowNotFound)),
            Err(MigrationError::Database(_))
        ));
    }

    #[test]
    fn test_embedded_migrations_present() {
        assert_eq!(MIGRATOR.iter().count(), 2);
    }
}
