//! Zendor Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates
//! - Remote Zendor API for accounts and profiles ([`zendor_backend`])
//! - In-memory sessions holding the customer's bearer token

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory of stylesheets and images, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router with its session, security-header,
/// request-id and tracing layers.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the remote API.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tower::ServiceExt;
    use zendor_backend::BackendConfig;
    use zendor_core::PhoneNumber;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_app() -> Router {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            // Nothing listens here: every API call fails fast
            backend: BackendConfig::with_base_url("http://127.0.0.1:9"),
            store_phone: PhoneNumber::parse("8433900692").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config).unwrap())
    }

    async fn body_text(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn lead(path: &str, name: &str) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::from(format!("name={}", urlencoding::encode(name))))
            .unwrap()
    }

    fn handoff() -> Request<Body> {
        Request::post("/auth/session")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::from(
                r#"{"token":"tok-123","email":"asha@example.com","name":"Asha","role":"customer"}"#,
            ))
            .unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health_has_security_headers() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_profile_redirects_before_render() {
        let response = test_app()
            .oneshot(Request::get("/profile?to=3").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_visit_store_page_shows_phone() {
        let response = test_app()
            .oneshot(Request::get("/visit-store").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("8433900692"));
        assert!(html.contains(r#"id="contact""#));
    }

    #[tokio::test]
    async fn test_whatsapp_lead_redirects_to_deep_link() {
        let response = test_app()
            .oneshot(lead("/visit-store/whatsapp", "Asha"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://wa.me/8433900692?text=Hi%21My%20name%20is%20Asha."));
    }

    #[tokio::test]
    async fn test_whatsapp_lead_without_name_returns_to_form() {
        let response = test_app()
            .oneshot(lead("/visit-store/whatsapp", "  "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/visit-store#contact");
    }

    #[tokio::test]
    async fn test_call_lead_needs_no_name() {
        let response = test_app()
            .oneshot(lead("/visit-store/call", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("tel:8433900692?body="));
    }

    #[tokio::test]
    async fn test_profile_falls_back_to_guest_when_api_fails() {
        let app = test_app();

        let response = app.clone().oneshot(handoff()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = session_cookie(&response);
        assert!(cookie.starts_with("zendor_session="));

        let response = app
            .oneshot(
                Request::get("/profile?to=3")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Guest User"));
        assert!(html.contains("My Cart"));
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_goes_home() {
        let app = test_app();
        let response = app.clone().oneshot(handoff()).await.unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .clone()
            .oneshot(
                Request::post("/auth/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let response = app
            .oneshot(
                Request::get("/profile")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }
}
