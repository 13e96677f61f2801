//! Domain models for the server.

pub mod favorite;
pub mod user;

pub use favorite::Favorite;
pub use user::{User, UserResponse};
