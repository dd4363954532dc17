//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;

use crate::filters;
use crate::middleware::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub signed_in: bool,
    pub name: Option<String>,
}

/// Display the home page.
pub async fn home(OptionalAuth(customer): OptionalAuth) -> HomeTemplate {
    HomeTemplate {
        signed_in: customer.is_some(),
        name: customer.map(|c| c.name),
    }
}
