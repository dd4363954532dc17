//! Integration tests for the storefront account pages.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use zendor_backend::BackendConfig;
use zendor_core::PhoneNumber;
use zendor_integration_tests::{CUSTOMER_TOKEN, FakeApi, browser, handoff, spawn_app};
use zendor_storefront::config::StorefrontConfig;
use zendor_storefront::state::AppState;

async fn start() -> (FakeApi, String) {
    let api = FakeApi::start().await;
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        backend: BackendConfig::with_base_url(api.base_url()),
        store_phone: PhoneNumber::parse("8433900692").unwrap(),
        sentry_dsn: None,
        sentry_environment: None,
    };
    let base = spawn_app(zendor_storefront::app(AppState::new(config).unwrap())).await;
    (api, base)
}

async fn page(client: &reqwest::Client, url: String) -> String {
    let response = client.get(url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.text().await.unwrap()
}

#[tokio::test]
async fn test_profile_sections_render_remote_document() {
    let (api, base) = start().await;
    let client = browser();

    let response = client
        .post(format!("{base}/auth/session"))
        .json(&handoff(CUSTOMER_TOKEN, "customer"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let dashboard = page(&client, format!("{base}/profile")).await;
    assert!(dashboard.contains("Hello, Asha Rao"));
    assert!(dashboard.contains("asha@example.com"));
    assert!(dashboard.contains("2023"));

    let cart = page(&client, format!("{base}/profile?to=3")).await;
    assert!(cart.contains("Ivory Linen"));
    assert!(cart.contains("2 item(s)"));

    let addresses = page(&client, format!("{base}/profile?to=5")).await;
    assert!(addresses.contains("A-501 Orchid Business Park"));
    assert!(addresses.contains("No shipping address saved."));

    let seen = api.requests_to("/api/user/getUserProfile");
    assert_eq!(seen.len(), 3);
    assert!(
        seen.iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer tok-customer"))
    );
}

#[tokio::test]
async fn test_rejected_token_shows_guest_defaults() {
    let (_api, base) = start().await;
    let client = browser();

    client
        .post(format!("{base}/auth/session"))
        .json(&handoff("tok-expired", "customer"))
        .send()
        .await
        .unwrap();

    let dashboard = page(&client, format!("{base}/profile?to=2")).await;
    assert!(dashboard.contains("Guest User"));
    assert!(dashboard.contains("You have not placed any orders yet."));
}
