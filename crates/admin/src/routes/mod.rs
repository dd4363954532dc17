//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /                       - Redirect to the first product family
//!
//! # Auth (tokens are issued by the remote login flow)
//! GET  /login                  - Login page
//! POST /auth/session           - Session handoff (JSON)
//! POST /auth/logout            - Logout
//!
//! # Products (HTMX fragments for everything but the page itself)
//! GET    /products/{family}                 - Listing page
//! GET    /products/{family}/grid            - Grid fragment
//! POST   /products/{family}/search          - Set search term (grid)
//! POST   /products/{family}/filters/toggle  - Toggle a sub-category (listing)
//! POST   /products/{family}/filters/clear   - Clear filters (listing)
//! POST   /products/{family}/next            - Scroll sentinel revealed (grid)
//! GET    /products/{family}/{id}            - Product detail
//! DELETE /products/{family}/{id}            - Delete product (grid)
//! ```

pub mod auth;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(auth::create_session))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{family}", get(products::index))
        .route("/{family}/grid", get(products::grid))
        .route("/{family}/search", post(products::search))
        .route("/{family}/filters/toggle", post(products::toggle_filter))
        .route("/{family}/filters/clear", post(products::clear_filters))
        .route("/{family}/next", post(products::next_page))
        .route(
            "/{family}/{id}",
            get(products::show).delete(products::delete),
        )
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::home))
        .route("/login", get(auth::login_page))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
}
