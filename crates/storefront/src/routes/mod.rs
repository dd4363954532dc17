//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Auth (tokens are issued by the remote login flow)
//! GET  /login                  - Login page
//! POST /auth/session           - Session handoff (JSON)
//! POST /auth/logout            - Logout
//!
//! # Account (requires auth)
//! GET  /profile?to=            - Account shell; `to` picks the sub-view
//!
//! # Visit store
//! GET  /visit-store            - Visit-store page
//! POST /visit-store/call       - 303 to a tel: link
//! POST /visit-store/whatsapp   - 303 to a wa.me link
//! ```

pub mod auth;
pub mod home;
pub mod profile;
pub mod visit_store;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, lead_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(auth::create_session))
        // Only routes above this line are rate limited
        .layer(auth_rate_limiter())
        .route("/logout", post(auth::logout))
}

/// Create the visit-store routes router.
pub fn visit_store_routes() -> Router<AppState> {
    Router::new()
        .route("/call", post(visit_store::call))
        .route("/whatsapp", post(visit_store::whatsapp))
        // Only routes above this line are rate limited
        .layer(lead_rate_limiter())
        .route("/", get(visit_store::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page))
        .route("/profile", get(profile::show))
        .nest("/auth", auth_routes())
        .nest("/visit-store", visit_store_routes())
}
