//! Business logic services.
//!
//! - `auth` - Registration, login and bearer token verification

pub mod auth;

pub use auth::{AuthError, AuthService};
