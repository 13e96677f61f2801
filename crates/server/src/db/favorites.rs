//! Favorite city repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use weather_dashboard_core::{City, FavoriteId, UserId};

use super::{FavoriteStore, RepositoryError};
use crate::models::Favorite;

#[derive(FromRow)]
struct FavoriteRow {
    id: i32,
    city: String,
    owner_user_id: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = RepositoryError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let city = City::parse(&row.city).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid city in database: {e}"))
        })?;

        Ok(Self {
            id: FavoriteId::new(row.id),
            city,
            owner_user_id: UserId::new(row.owner_user_id),
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL`-backed [`FavoriteStore`].
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for PgFavoriteRepository {
    async fn create_favorite(
        &self,
        city: &City,
        owner: UserId,
    ) -> Result<Favorite, RepositoryError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            r"
            INSERT INTO favorites (city, owner_user_id)
            VALUES ($1, $2)
            RETURNING id, city, owner_user_id, created_at
            ",
        )
        .bind(city.as_str())
        .bind(owner.as_i32())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_favorites(&self, owner: UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r"
            SELECT id, city, owner_user_id, created_at
            FROM favorites
            WHERE owner_user_id = $1
            ORDER BY id
            ",
        )
        .bind(owner.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Favorite::try_from).collect()
    }
}
