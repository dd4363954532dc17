//! Integration test harness for Zendor.
//!
//! [`FakeApi`] serves a small, fixed catalog and one user document under
//! `/api`, shaped like the remote Zendor API (including its looseness:
//! `_id` keys, `"None"` placeholders, bare-id collections). It records every
//! request so tests can assert on paths, query strings and bearer headers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zendor-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};

/// Token the fake accepts for the admin user.
pub const ADMIN_TOKEN: &str = "tok-admin";
/// Token the fake accepts for the customer.
pub const CUSTOMER_TOKEN: &str = "tok-customer";

/// Products per wallpaper sub-category.
const MATTE: [&str; 7] = [
    "Ivory Linen",
    "Sage Weave",
    "Chalk Stripe",
    "Dune",
    "Slate Plain",
    "Oat Grain",
    "Mist",
];
const TEXTURED: [&str; 6] = [
    "Palm Relief",
    "Cork Bark",
    "Raffia",
    "Stone Wash",
    "Grasscloth",
    "Ripple",
];

/// One request as seen by the fake.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

type Log = Arc<Mutex<Vec<RecordedRequest>>>;

/// A running fake of the remote API.
pub struct FakeApi {
    addr: SocketAddr,
    log: Log,
}

impl FakeApi {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let log: Log = Arc::default();
        let app = Router::new().fallback(handle).with_state(Arc::clone(&log));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, log }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Requests whose path equals `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

/// Serve `app` on an ephemeral port and return its base URL.
///
/// Connect info is attached so per-IP rate limits can key on the peer.
pub async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("http://{addr}")
}

/// A browser-like client: keeps cookies and does not follow redirects.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// The session handoff body the remote login flow would post.
#[must_use]
pub fn handoff(token: &str, role: &str) -> Value {
    json!({
        "token": token,
        "email": "asha@example.com",
        "name": "Asha Rao",
        "role": role,
    })
}

async fn handle(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    log.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        authorization: authorization.clone(),
    });

    let Some(path) = uri.path().strip_prefix("/api/") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let segments: Vec<&str> = path.split('/').collect();

    match (method, segments.as_slice()) {
        (Method::GET, ["wallpapers", "getCategories"]) => Json(json!({
            "status": "success",
            "data": [{ "name": "Matte" }, { "name": "Textured" }, { "name": null }],
        }))
        .into_response(),
        (Method::GET, ["wooden-floors", "getCategories"]) => {
            Json(json!({ "status": "success", "data": [{ "name": "Oak" }] })).into_response()
        }
        (Method::GET, ["wallpapers", "products"]) => {
            Json(json!({ "status": "success", "data": wallpaper_page(&params) })).into_response()
        }
        (Method::GET, ["wooden-floors", "products"]) => {
            Json(json!({ "status": "success", "data": [] })).into_response()
        }
        (Method::GET, ["wallpapers", "product", id]) => match wallpaper(id) {
            Some(product) => Json(json!({ "status": "success", "data": product })).into_response(),
            None => Json(json!({ "status": "fail", "message": "Product not found" })).into_response(),
        },
        (Method::DELETE, ["wooden-floors", "products", _id]) => {
            Json(json!({ "status": "success", "message": "Product deleted" })).into_response()
        }
        (Method::GET, ["user", "getUserProfile"]) => match authorization.as_deref() {
            Some(auth) if auth == format!("Bearer {CUSTOMER_TOKEN}") => {
                Json(json!({ "status": "success", "data": customer_document() })).into_response()
            }
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Not authorized, token failed" })),
            )
                .into_response(),
        },
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn all_wallpapers() -> Vec<Value> {
    MATTE
        .iter()
        .map(|name| ("Matte", *name))
        .chain(TEXTURED.iter().map(|name| ("Textured", *name)))
        .enumerate()
        .map(|(i, (sub_category, name))| {
            json!({
                "_id": format!("wp-{}", i + 1),
                "name": name,
                "price": "1250.00",
                "images": ["", format!("https://cdn.example.com/wp-{}.jpg", i + 1)],
                "description": format!("{name} wallpaper roll."),
                "subCategory": sub_category,
            })
        })
        .collect()
}

fn wallpaper(id: &str) -> Option<Value> {
    all_wallpapers().into_iter().find(|p| p["_id"] == id)
}

/// Filter by `subCategories` and `search`, then paginate by `page` and `limit`.
fn wallpaper_page(params: &HashMap<String, String>) -> Vec<Value> {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
    let search = params.get("search").map(|s| s.to_lowercase()).unwrap_or_default();
    let categories: Vec<&str> = params
        .get("subCategories")
        .map(|c| c.split(',').collect())
        .unwrap_or_default();

    all_wallpapers()
        .into_iter()
        .filter(|p| {
            categories.is_empty()
                || categories
                    .iter()
                    .any(|c| p["subCategory"].as_str() == Some(*c))
        })
        .filter(|p| {
            p["name"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&search))
        })
        .skip(page.saturating_sub(1) * limit)
        .take(limit)
        .collect()
}

fn customer_document() -> Value {
    json!({
        "_id": "u-42",
        "userName": "Asha Rao",
        "email": "asha@example.com",
        "phone": 8433900692_u64,
        "profilePicture": "None",
        "createdAt": "2023-04-01T10:00:00.000Z",
        "role": "customer",
        "orders": ["ord-1", { "_id": "ord-2", "status": "Delivered", "totalAmount": "2500" }],
        "MoodBoard": null,
        "cart": [{ "productId": "wp-1", "name": "Ivory Linen", "quantity": 2, "price": "1250.00" }],
        "billingAddress": {
            "street": "A-501 Orchid Business Park",
            "city": "Mumbai",
            "zipCode": "400059"
        },
        "shippingAddress": "None",
    })
}
