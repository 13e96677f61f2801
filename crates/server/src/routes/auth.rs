//! Registration and login API handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::UserResponse;
use crate::state::AppState;

/// Body of `POST /register` and `POST /login`.
///
/// Absent fields deserialize as empty strings so the service reports them as
/// missing rather than the JSON layer rejecting the body.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body returned from a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Create an account.
///
/// # Errors
///
/// Returns 400 if a field is missing or the email is taken.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let Json(body) = body?;

    let user = state.auth().register(&body.email, &body.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Exchange credentials for a bearer token.
///
/// # Errors
///
/// Returns 401 for any unknown email, wrong password or empty field.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(body) = body?;

    let issued = state.auth().login(&body.email, &body.password).await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}
