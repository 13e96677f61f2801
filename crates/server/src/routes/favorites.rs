//! Favorite city handlers. Both require a bearer token.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use weather_dashboard_core::City;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Favorite;
use crate::state::AppState;

/// Body of `POST /favorites`.
#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    #[serde(default)]
    pub city: String,
}

/// Save a city for the caller.
///
/// # Errors
///
/// Returns 400 if `city` is blank and 500 if the store fails.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    body: std::result::Result<Json<CreateFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Favorite>)> {
    let Json(body) = body?;
    let city = City::parse(&body.city)?;

    let favorite = state.favorites().create_favorite(&city, user_id).await?;

    tracing::info!(
        favorite_id = %favorite.id,
        user_id = %user_id,
        "favorite saved"
    );
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// List the caller's favorites, oldest first.
///
/// # Errors
///
/// Returns 500 if the store fails.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Favorite>>> {
    let favorites = state.favorites().list_favorites(user_id).await?;
    Ok(Json(favorites))
}
