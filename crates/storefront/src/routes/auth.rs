//! Authentication route handlers.
//!
//! Accounts, passwords and token issuance belong to the remote API. The
//! storefront receives the issued token through a session handoff and keeps
//! it server-side.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use zendor_backend::SessionHandoff;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub signed_in: bool,
}

/// Display the login page, or the account for visitors already signed in.
pub async fn login_page(OptionalAuth(customer): OptionalAuth) -> Response {
    if customer.is_some() {
        return Redirect::to("/profile").into_response();
    }
    LoginTemplate { signed_in: false }.into_response()
}

/// Accept a token handed over by the remote login flow.
pub async fn create_session(
    session: Session,
    Json(handoff): Json<SessionHandoff>,
) -> Result<StatusCode, AppError> {
    let customer = CurrentCustomer::from(handoff);
    set_current_customer(&session, &customer)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(customer.email.as_ref().map(|e| e.as_str()), &customer.name);
    tracing::info!(role = customer.role.label(), "Customer signed in");

    Ok(StatusCode::NO_CONTENT)
}

/// Sign out: forget token, email, name and role, then go home.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    if clear_current_customer(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?
        .is_some()
    {
        tracing::info!("Customer signed out");
    }
    clear_sentry_user();

    Ok(Redirect::to("/"))
}
