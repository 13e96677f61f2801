//! Core types for Weather Dashboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod city;
pub mod email;
pub mod id;

pub use city::{City, CityError};
pub use email::{Email, EmailError};
pub use id::*;
