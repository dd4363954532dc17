//! Authentication extractors for admin.
//!
//! Provides extractors for requiring admin authentication in route handlers.
//! The guard runs before the handler, so nothing is rendered or fetched for
//! visitors who are not signed in.

use axum::{
    extract::FromRequestParts,
    http::{HeaderName, HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a signed-in admin.
///
/// Visitors without a session are redirected to the login page (or told to
/// navigate there, for HTMX requests). Signed-in users whose role is not
/// admin get 403 Forbidden.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Error returned when admin authentication is required.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for full page loads).
    RedirectToLogin,
    /// HTMX request: 401 with `HX-Redirect` so the whole page navigates.
    HtmxRedirectToLogin,
    /// No session layer installed.
    Unauthorized,
    /// Signed in, but not an admin.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::HtmxRedirectToLogin => (
                StatusCode::UNAUTHORIZED,
                [(
                    HeaderName::from_static("hx-redirect"),
                    HeaderValue::from_static(LOGIN_PATH),
                )],
            )
                .into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only admins can access this console",
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.headers.contains_key("hx-request") {
                    AdminAuthRejection::HtmxRedirectToLogin
                } else {
                    AdminAuthRejection::RedirectToLogin
                }
            })?;

        if !admin.role.is_admin() {
            tracing::warn!(name = %admin.name, "Non-admin tried to use the admin console");
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdmin`, this does not reject the request if nobody is
/// signed in.
pub struct OptionalAdmin(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// The session id is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(
    session: &Session,
) -> Result<Option<CurrentAdmin>, tower_sessions::session::Error> {
    let admin = session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    session.flush().await?;
    Ok(admin)
}
