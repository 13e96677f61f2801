//! Weather Dashboard Core - Shared types library.
//!
//! This crate provides common types used across all Weather Dashboard components:
//! - `server` - REST API and frontend shell
//! - `cli` - Command-line tools for migrations
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and city names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
