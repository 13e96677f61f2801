//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (for a separately served frontend)
//! 5. Bearer token (protected routes only)

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, require_bearer_token};
pub use request_id::request_id_middleware;
