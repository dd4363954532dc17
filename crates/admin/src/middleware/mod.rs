//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Auth guard (`RequireAdmin` extractor on protected routes)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    LOGIN_PATH, OptionalAdmin, RequireAdmin, clear_current_admin, set_current_admin,
};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
