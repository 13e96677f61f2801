//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::{CredentialStore, FavoriteStore, MemoryStore};
use crate::services::AuthService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the stores and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    auth: AuthService,
    users: Arc<dyn CredentialStore>,
    favorites: Arc<dyn FavoriteStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `users` - Credential store backing registration and login
    /// * `favorites` - Favorite city store
    #[must_use]
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn CredentialStore>,
        favorites: Arc<dyn FavoriteStore>,
    ) -> Self {
        let auth = AuthService::new(Arc::clone(&users), &config.auth);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                users,
                favorites,
            }),
        }
    }

    /// Create a state backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn users(&self) -> &dyn CredentialStore {
        self.inner.users.as_ref()
    }

    /// Get a reference to the favorite store.
    #[must_use]
    pub fn favorites(&self) -> &dyn FavoriteStore {
        self.inner.favorites.as_ref()
    }
}
