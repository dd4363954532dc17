//! Visit-store route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::services::{LeadChannel, LeadError, VisitRequest};
use crate::state::AppState;

/// Where a `WhatsApp` lead without a name is sent back to.
pub const CONTACT_ANCHOR: &str = "/visit-store#contact";

/// Lead form data.
#[derive(Debug, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub name: String,
}

/// Visit-store page template.
#[derive(Template, WebTemplate)]
#[template(path = "visit_store.html")]
pub struct VisitStoreTemplate {
    pub signed_in: bool,
    /// Prefilled from the session for signed-in visitors.
    pub name: String,
    pub store_phone: String,
}

/// Display the visit-store page.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(customer): OptionalAuth,
) -> VisitStoreTemplate {
    VisitStoreTemplate {
        signed_in: customer.is_some(),
        name: customer.map(|c| c.name).unwrap_or_default(),
        store_phone: state.config().store_phone.to_string(),
    }
}

fn lead_redirect(state: &AppState, form: &LeadForm, channel: LeadChannel) -> Redirect {
    let request = VisitRequest::new(&form.name, &state.config().store_phone);

    match request.link(channel) {
        Ok(link) => {
            add_breadcrumb("lead", "Visit-store lead", Some(&[("channel", channel.as_str())]));
            tracing::info!(channel = channel.as_str(), "Visit-store lead");
            Redirect::to(&link)
        }
        Err(LeadError::MissingName) => {
            tracing::debug!(channel = channel.as_str(), "Lead without a name");
            Redirect::to(CONTACT_ANCHOR)
        }
    }
}

/// "Call us": 303 to a `tel:` link.
#[instrument(skip_all)]
pub async fn call(State(state): State<AppState>, Form(form): Form<LeadForm>) -> Redirect {
    lead_redirect(&state, &form, LeadChannel::Call)
}

/// "`WhatsApp` us": 303 to a `wa.me` link, or back to the form without a name.
#[instrument(skip_all)]
pub async fn whatsapp(State(state): State<AppState>, Form(form): Form<LeadForm>) -> Redirect {
    lead_redirect(&state, &form, LeadChannel::WhatsApp)
}
