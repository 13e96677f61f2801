//! Integration tests for Weather Dashboard.
//!
//! These run against a live server backed by `PostgreSQL`, so every test is
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p weather-dashboard-cli -- migrate
//! cargo run -p weather-dashboard-server &
//! cargo test -p weather-dashboard-integration-tests -- --ignored
//! ```
//!
//! Set `SERVER_BASE_URL` to target a server other than `http://localhost:3000`.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("SERVER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// An email no previous run has registered.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4())
}

/// Register `email`/`password` and log in, returning the bearer token.
///
/// # Errors
///
/// Returns `reqwest::Error` if either request fails or login is rejected.
pub async fn register_and_login(
    client: &Client,
    email: &str,
    password: &str,
) -> Result<String, reqwest::Error> {
    let base = base_url();
    let credentials = json!({ "email": email, "password": password });

    client
        .post(format!("{base}/register"))
        .json(&credentials)
        .send()
        .await?
        .error_for_status()?;

    let body: Value = client
        .post(format!("{base}/login"))
        .json(&credentials)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(body["token"].as_str().unwrap_or_default().to_owned())
}
