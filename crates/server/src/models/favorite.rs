//! Favorite city domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use weather_dashboard_core::{City, FavoriteId, UserId};

/// A city saved by a user.
///
/// The same city may be saved more than once by the same owner.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Unique favorite ID.
    pub id: FavoriteId,
    /// Free-text city name.
    pub city: City,
    /// User who saved this favorite.
    pub owner_user_id: UserId,
    /// When the favorite was saved.
    pub created_at: DateTime<Utc>,
}
