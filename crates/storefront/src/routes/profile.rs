//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;
use zendor_core::{Address, CartItem, MoodBoardItem, OrderSummary, ProfileSection, UserProfile};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile page query parameters.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    /// Sub-view id; anything unparseable shows the dashboard.
    pub to: Option<String>,
}

impl ProfileQuery {
    fn section(&self) -> ProfileSection {
        self.to
            .as_deref()
            .and_then(|to| to.trim().parse::<u8>().ok())
            .map(ProfileSection::from_id)
            .unwrap_or_default()
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Entry of the account menu.
#[derive(Debug, Clone)]
pub struct SectionLinkView {
    pub id: u8,
    pub label: &'static str,
    pub active: bool,
}

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub status: String,
    pub total: Option<String>,
    pub placed_on: Option<String>,
}

impl From<&OrderSummary> for OrderView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            id: order
                .id
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
            status: order.status.clone().unwrap_or_else(|| "Pending".to_owned()),
            total: order.total_amount.map(|amount| format!("₹{}", amount.normalize())),
            placed_on: order
                .created_at
                .map(|at| at.format("%d %b %Y").to_string()),
        }
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub name: String,
    pub quantity: u32,
    pub price: Option<String>,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item
                .name
                .clone()
                .or_else(|| item.product_id.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "Product".to_owned()),
            quantity: item.quantity.max(1),
            price: item.price.map(|price| format!("₹{}", price.normalize())),
        }
    }
}

/// Mood board display data for templates.
#[derive(Debug, Clone)]
pub struct MoodBoardView {
    pub name: String,
    pub image: Option<String>,
}

impl From<&MoodBoardItem> for MoodBoardView {
    fn from(item: &MoodBoardItem) -> Self {
        Self {
            name: item
                .name
                .clone()
                .or_else(|| item.product_id.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "Saved product".to_owned()),
            image: item.image.clone(),
        }
    }
}

/// Profile display data for templates.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub member_since: Option<i32>,
    pub role: &'static str,
    pub orders: Vec<OrderView>,
    pub cart: Vec<CartItemView>,
    pub cart_units: u32,
    pub mood_board: Vec<MoodBoardView>,
    pub billing_address: Option<String>,
    pub shipping_address: Option<String>,
}

fn address_line(address: Option<&Address>) -> Option<String> {
    address
        .filter(|address| !address.is_empty())
        .map(Address::one_line)
}

impl From<&UserProfile> for ProfileView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_name: profile.user_name.clone(),
            email: profile.email.as_ref().map(ToString::to_string),
            phone: profile.phone.as_ref().map(ToString::to_string),
            avatar: profile.profile_picture.clone(),
            member_since: profile.member_since(),
            role: profile.role.label(),
            orders: profile.orders.iter().map(OrderView::from).collect(),
            cart: profile.cart.iter().map(CartItemView::from).collect(),
            cart_units: profile.cart_units(),
            mood_board: profile.mood_board.iter().map(MoodBoardView::from).collect(),
            billing_address: address_line(profile.billing_address.as_ref()),
            shipping_address: address_line(profile.shipping_address.as_ref()),
        }
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub signed_in: bool,
    pub profile: ProfileView,
    pub sections: Vec<SectionLinkView>,
    pub section: &'static str,
}

/// Section key the template switches on.
const fn section_key(section: ProfileSection) -> &'static str {
    match section {
        ProfileSection::Dashboard => "dashboard",
        ProfileSection::Orders => "orders",
        ProfileSection::Cart => "cart",
        ProfileSection::MoodBoard => "mood-board",
        ProfileSection::Addresses => "addresses",
    }
}

/// Display the account page.
///
/// The profile is always fetched; if that fails the failure is logged and
/// the page shows the guest defaults.
#[instrument(skip(state, customer, query), fields(section = tracing::field::Empty))]
pub async fn show(
    RequireAuth(customer): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ProfileTemplate {
    let section = query.section();
    tracing::Span::current().record("section", section.id());

    let profile = match state.backend().get_user_profile(&customer.token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch user profile: {e}");
            UserProfile::guest()
        }
    };

    let sections = ProfileSection::ALL
        .into_iter()
        .map(|s| SectionLinkView {
            id: s.id(),
            label: s.label(),
            active: s == section,
        })
        .collect();

    ProfileTemplate {
        signed_in: true,
        profile: ProfileView::from(&profile),
        sections,
        section: section_key(section),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn query(to: Option<&str>) -> ProfileQuery {
        ProfileQuery {
            to: to.map(str::to_owned),
        }
    }

    #[test]
    fn test_to_selects_section() {
        assert_eq!(query(Some("3")).section(), ProfileSection::Cart);
        assert_eq!(query(Some("5")).section(), ProfileSection::Addresses);
        assert_eq!(query(None).section(), ProfileSection::Dashboard);
        assert_eq!(query(Some("cart")).section(), ProfileSection::Dashboard);
        assert_eq!(query(Some("9")).section(), ProfileSection::Dashboard);
    }

    #[test]
    fn test_guest_profile_view() {
        let view = ProfileView::from(&UserProfile::guest());
        assert_eq!(view.user_name, "Guest User");
        assert_eq!(view.role, "Customer");
        assert!(view.orders.is_empty());
        assert!(view.billing_address.is_none());
        assert_eq!(view.cart_units, 0);
    }

    #[test]
    fn test_cart_line_falls_back_to_product_id() {
        let item = CartItem {
            product_id: Some("665f1c".into()),
            name: None,
            quantity: 0,
            price: Some(Decimal::new(4950, 2)),
        };
        let view = CartItemView::from(&item);
        assert_eq!(view.name, "665f1c");
        assert_eq!(view.quantity, 1);
        assert_eq!(view.price.as_deref(), Some("₹49.5"));
    }
}
