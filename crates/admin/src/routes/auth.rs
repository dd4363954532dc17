//! Authentication route handlers.
//!
//! Credentials are issued by the remote API's login flow; this console only
//! receives the resulting token and keeps it in the server-side session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use zendor_backend::SessionHandoff;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{LOGIN_PATH, OptionalAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate;

/// Display the login page, or go straight to the console when signed in.
pub async fn login_page(OptionalAdmin(admin): OptionalAdmin) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate.into_response()
}

/// Accept a token handed over by the remote login flow.
///
/// Only accounts whose role is `admin` may start a console session.
pub async fn create_session(
    session: Session,
    Json(handoff): Json<SessionHandoff>,
) -> Result<StatusCode, AppError> {
    if !handoff.role.is_admin() {
        tracing::warn!("Rejected console session for non-admin account");
        return Err(AppError::Forbidden("admin role required".to_string()));
    }

    let admin = CurrentAdmin::from_handoff(handoff);
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(admin.email.as_ref().map(|e| e.as_str()), &admin.name);
    tracing::info!(name = %admin.name, "Admin signed in");

    Ok(StatusCode::NO_CONTENT)
}

/// Sign out: clear the session and stop this sign-in's listings.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let admin = clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    if let Some(admin) = admin {
        state.listings().close_session(admin.session_key).await;
        tracing::info!(name = %admin.name, "Admin signed out");
    }
    clear_sentry_user();

    Ok(Redirect::to(LOGIN_PATH))
}
