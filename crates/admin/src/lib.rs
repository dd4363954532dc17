//! Zendor Admin library.
//!
//! This crate provides the product administration console as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates and HTMX fragments
//! - One listing task per signed-in admin and product family ([`listing`])
//! - Remote Zendor API for catalog data ([`zendor_backend`])
//! - In-memory sessions holding the admin's bearer token

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Build the admin router with its session, request-id and tracing layers.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
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
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use zendor_backend::BackendConfig;

    use super::*;
    use crate::config::AdminConfig;

    fn test_app() -> Router {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            backend: BackendConfig::with_base_url("http://127.0.0.1:9"),
            listing_idle: Duration::from_secs(60),
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config).unwrap())
    }

    fn handoff(role: &str) -> Request<Body> {
        Request::post("/auth/session")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(
                r#"{{"token":"tok-123","email":"ops@zendor.in","name":"Ops","role":"{role}"}}"#
            )))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = test_app()
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_listing_redirects_to_login_without_session() {
        let response = test_app()
            .oneshot(
                Request::get("/products/wallpapers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_htmx_request_gets_hx_redirect() {
        let response = test_app()
            .oneshot(
                Request::post("/products/wallpapers/next")
                    .header("hx-request", "true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["hx-redirect"], "/login");
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let response = test_app()
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Zendor Admin"));
    }

    #[tokio::test]
    async fn test_handoff_requires_admin_role() {
        let response = test_app().oneshot(handoff("customer")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_admin_handoff_sets_session_cookie() {
        let response = test_app().oneshot(handoff("admin")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("zendor_admin_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[tokio::test]
    async fn test_signed_in_admin_home_redirects_to_wallpapers() {
        let app = test_app();
        let response = app.clone().oneshot(handoff("admin")).await.unwrap();
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/products/wallpapers");
    }

    async fn send_html(app: &Router, request: Request<Body>) -> String {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn get(path: &str, cookie: &str) -> Request<Body> {
        Request::get(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_family_switch_clears_search() {
        let app = test_app();
        let response = app.clone().oneshot(handoff("admin")).await.unwrap();
        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        send_html(&app, get("/products/wallpapers", &cookie)).await;
        send_html(
            &app,
            Request::post("/products/wallpapers/search")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("hx-request", "true")
                .body(Body::from("search=oak"))
                .unwrap(),
        )
        .await;

        let html = send_html(&app, get("/products/wallpapers", &cookie)).await;
        assert!(html.contains(r#"name="search" value="oak""#));

        let html = send_html(&app, get("/products/wooden-floorings", &cookie)).await;
        assert!(html.contains(r#"name="search" value="""#));

        let html = send_html(&app, get("/products/wallpapers", &cookie)).await;
        assert!(html.contains(r#"name="search" value="""#));
        assert!(!html.contains(r#"value="oak""#));
    }
}
