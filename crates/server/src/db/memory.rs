//! In-process store used when no database is configured, and by tests.
//!
//! Data lives only as long as the process.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use weather_dashboard_core::{City, Email, FavoriteId, UserId};

use super::{CredentialStore, FavoriteStore, RepositoryError};
use crate::models::{Favorite, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    favorites: Vec<Favorite>,
    next_user_id: i32,
    next_favorite_id: i32,
}

/// Volatile [`CredentialStore`] and [`FavoriteStore`].
///
/// Ids start at 1 and increase monotonically, mirroring `SERIAL` columns.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| &u.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: UserId::new(tables.next_user_id),
            email: email.clone(),
            password_hash: password_hash.to_owned(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.email == email).cloned())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn create_favorite(
        &self,
        city: &City,
        owner: UserId,
    ) -> Result<Favorite, RepositoryError> {
        let mut tables = self.tables.write().await;

        tables.next_favorite_id += 1;
        let favorite = Favorite {
            id: FavoriteId::new(tables.next_favorite_id),
            city: city.clone(),
            owner_user_id: owner,
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());

        Ok(favorite)
    }

    async fn list_favorites(&self, owner: UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.owner_user_id == owner)
            .cloned()
            .collect())
    }
}
