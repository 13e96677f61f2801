//! Weather Dashboard server library.
//!
//! Registration, login and per-user favorite cities over a JSON API, plus the
//! server-rendered Home/Login/Register shell. Exposed as a library so the
//! router can be driven in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
