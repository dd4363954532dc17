//! Product listing, detail and delete route handlers.
//!
//! The listing itself lives in a per-admin task (see [`crate::listing`]);
//! handlers forward the visitor's action to it, wait for it to settle and
//! render the resulting snapshot.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use zendor_core::{Product, ProductFamily, ProductId};

use crate::{
    error::AppError,
    filters,
    listing::{CatalogSource, ListingHandle, ListingSnapshot},
    middleware::RequireAdmin,
    models::CurrentAdmin,
    state::AppState,
};

/// Search form data.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

/// Filter toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub category: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Signed-in admin shown in the header.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: Option<String>,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.as_ref().map(ToString::to_string),
        }
    }
}

/// Navigation entry for a product family.
#[derive(Debug, Clone)]
pub struct NavItemView {
    pub slug: &'static str,
    pub label: &'static str,
    pub active: bool,
}

fn nav_items(current: ProductFamily) -> Vec<NavItemView> {
    ProductFamily::ALL
        .into_iter()
        .map(|family| NavItemView {
            slug: family.slug(),
            label: family.label(),
            active: family == current,
        })
        .collect()
}

/// Product card in the grid.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub price: Option<String>,
    pub sub_category: Option<String>,
    pub description: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.display_price().map(|p| p.to_string()),
            sub_category: product.sub_category.clone(),
            description: product.description.clone(),
        }
    }
}

/// One entry of the category vocabulary.
#[derive(Debug, Clone)]
pub struct FilterOptionView {
    pub name: String,
    pub selected: bool,
}

/// Category filter panel.
#[derive(Debug, Clone)]
pub struct FilterPanelView {
    pub has_catalog: bool,
    pub loading: bool,
    pub options: Vec<FilterOptionView>,
    /// Selected categories, in selection order.
    pub selected: Vec<String>,
    pub show_clear_all: bool,
}

/// Product grid with the scroll sentinel.
#[derive(Debug, Clone)]
pub struct GridView {
    pub cards: Vec<ProductCardView>,
    pub has_more: bool,
    pub loading: bool,
    pub empty: bool,
}

/// Everything rendered for one listing.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub family: &'static str,
    pub label: &'static str,
    pub has_catalog: bool,
    pub search: String,
    pub filters: FilterPanelView,
    pub grid: GridView,
}

impl From<&ListingSnapshot> for ListingView {
    fn from(snapshot: &ListingSnapshot) -> Self {
        let state = &snapshot.state;
        let family = state.family();
        let filters = state.filters();

        let options = state
            .categories()
            .unwrap_or_default()
            .iter()
            .map(|name| FilterOptionView {
                name: name.clone(),
                selected: filters.contains(name),
            })
            .collect();

        Self {
            family: family.slug(),
            label: family.label(),
            has_catalog: family.has_catalog(),
            search: state.search().to_owned(),
            filters: FilterPanelView {
                has_catalog: family.has_catalog(),
                loading: snapshot.categories_loading,
                options,
                selected: filters.iter().map(str::to_owned).collect(),
                show_clear_all: filters.len() > 1,
            },
            grid: GridView {
                cards: state.products().iter().map(ProductCardView::from).collect(),
                has_more: state.has_more(),
                loading: state.is_loading(),
                empty: state.is_empty_result(),
            },
        }
    }
}

/// Product detail.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub price: Option<String>,
    pub sample_cost: Option<String>,
    pub description: String,
    pub brand: Option<String>,
    pub finish: Option<String>,
    pub surface: Option<String>,
    pub sub_category: Option<String>,
    pub stock: Option<i64>,
    pub tags: Vec<String>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price.map(|p| p.to_string()),
            sample_cost: product.sample_cost.map(|p| p.to_string()),
            description: product.description.clone(),
            brand: product.brand.clone(),
            finish: product.finish.clone(),
            surface: product.surface.clone(),
            sub_category: product.sub_category.clone(),
            stock: product.stock,
            tags: product.tags.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub nav: Vec<NavItemView>,
    pub listing: ListingView,
}

/// Filters plus grid fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/listing.html")]
pub struct ListingTemplate {
    pub listing: ListingView,
}

/// Grid fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/grid.html")]
pub struct GridTemplate {
    pub listing: ListingView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub admin_user: AdminUserView,
    pub nav: Vec<NavItemView>,
    pub family: &'static str,
    pub label: &'static str,
    pub product: ProductDetailView,
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_family(slug: &str) -> Result<ProductFamily, AppError> {
    slug.parse()
        .map_err(|_| AppError::NotFound(format!("product family {slug}")))
}

/// The admin's listing, started on first use and switched to `family`.
async fn listing_for(
    state: &AppState,
    admin: &CurrentAdmin,
    family: ProductFamily,
) -> Result<ListingHandle, AppError> {
    let handle = state
        .listings()
        .get_or_spawn(admin.session_key, family, || {
            CatalogSource::new(state.backend().clone(), Some(admin.token.clone()))
        })
        .await?;
    Ok(handle)
}

async fn settled_view(handle: &ListingHandle) -> Result<ListingView, AppError> {
    let snapshot = handle.settled().await?;
    Ok(ListingView::from(&snapshot))
}

// =============================================================================
// Handlers
// =============================================================================

/// Landing page: the first product family.
pub async fn home(RequireAdmin(_admin): RequireAdmin) -> Redirect {
    Redirect::to(&format!("/products/{}", ProductFamily::Wallpapers.slug()))
}

/// Listing page handler.
#[instrument(skip(admin, state), fields(name = %admin.name))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> Result<ProductsIndexTemplate, AppError> {
    let family = parse_family(&family)?;
    let handle = listing_for(&state, &admin, family).await?;
    let listing = settled_view(&handle).await?;

    Ok(ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        nav: nav_items(family),
        listing,
    })
}

/// Grid fragment handler.
#[instrument(skip(admin, state))]
pub async fn grid(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> Result<GridTemplate, AppError> {
    let family = parse_family(&family)?;
    let handle = listing_for(&state, &admin, family).await?;
    let listing = settled_view(&handle).await?;
    Ok(GridTemplate { listing })
}

/// Search input changed.
#[instrument(skip(admin, state, form), fields(search = %form.search))]
pub async fn search(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(family): Path<String>,
    Form(form): Form<SearchForm>,
) -> Result<GridTemplate, AppError> {
    let family = parse_family(&family)?;
    let handle = listing_for(&state, &admin, family).await?;
    handle.set_search(form.search).await?;
    let listing = settled_view(&handle).await?;
    Ok(GridTemplate { listing })
}

/// A category checkbox or chip was clicked.
#[instrument(skip(admin, state, form), fields(category = %form.category))]
pub async fn toggle_filter(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(family): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<ListingTemplate, AppError> {
    let family = parse_family(&family)?;
    let handle = listing_for(&state, &admin, family).await?;
    handle.toggle_filter(form.category).await?;
    let listing = settled_view(&handle).await?;
    Ok(ListingTemplate { listing })
}

/// "Clear all" was clicked.
#[instrument(skip(admin, state))]
pub async fn clear_filters(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> Result<ListingTemplate, AppError> {
    let family = parse_family(&family)?;
    let handle = listing_for(&state, &admin, family).await?;
    handle.clear_filters().await?;
    let listing = settled_view(&handle).await?;
    Ok(ListingTemplate { listing })
}

/// The scroll sentinel was revealed.
#[instrument(skip(admin, state))]
pub async fn next_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(family): Path<String>,
) -> Result<GridTemplate, AppError> {
    let family = parse_family(&family)?;
    let handle = listing_for(&state, &admin, family).await?;
    if !handle.advance().await? {
        tracing::debug!("Sentinel revealed with nothing more to load");
    }
    let listing = settled_view(&handle).await?;
    Ok(GridTemplate { listing })
}

/// Product detail page handler.
///
/// Unsuccessful lookups are logged and send the admin back to the listing.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((family, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let family = parse_family(&family)?;
    let id = ProductId::new(id);

    match state
        .backend()
        .get_product(family, &id, Some(&admin.token))
        .await
    {
        Ok(product) => Ok(ProductShowTemplate {
            admin_user: AdminUserView::from(&admin),
            nav: nav_items(family),
            family: family.slug(),
            label: family.label(),
            product: ProductDetailView::from(&product),
        }
        .into_response()),
        Err(e) => {
            tracing::error!(%family, product_id = %id, "Failed to fetch product: {e}");
            Ok(Redirect::to(&format!("/products/{}", family.slug())).into_response())
        }
    }
}

/// Delete a product, then re-render the grid.
///
/// The card is removed only after the remote API confirms the delete.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((family, id)): Path<(String, String)>,
) -> Result<GridTemplate, AppError> {
    let family = parse_family(&family)?;
    let id = ProductId::new(id);
    let handle = listing_for(&state, &admin, family).await?;

    match state
        .backend()
        .delete_product(&id, Some(&admin.token))
        .await
    {
        Ok(()) => {
            tracing::info!(%family, product_id = %id, "Product deleted");
            handle.remove(id).await?;
        }
        Err(e) => {
            tracing::error!(%family, product_id = %id, "Failed to delete product: {e}");
        }
    }

    let listing = settled_view(&handle).await?;
    Ok(GridTemplate { listing })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use zendor_core::Price;

    use super::*;

    #[test]
    fn test_parse_family() {
        assert_eq!(
            parse_family("wooden-floorings").ok(),
            Some(ProductFamily::WoodenFloorings)
        );
        assert!(matches!(
            parse_family("carpets"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_nav_marks_current_family() {
        let nav = nav_items(ProductFamily::Acoustics);
        assert_eq!(nav.len(), 3);
        assert!(nav.iter().filter(|n| n.active).all(|n| n.slug == "acoustics"));
        assert_eq!(nav.iter().filter(|n| n.active).count(), 1);
    }

    #[test]
    fn test_card_prefers_sample_cost() {
        let mut product = Product::new("p1", "Oak Classic");
        product.price = Some(Price::inr(Decimal::new(2400, 0)));
        product.sample_cost = Some(Price::inr(Decimal::new(150, 0)));

        let card = ProductCardView::from(&product);
        assert_eq!(card.id, "p1");
        assert_eq!(card.price.as_deref(), Some("₹150"));
    }

    #[test]
    fn test_listing_view_of_fresh_state() {
        let snapshot = ListingSnapshot {
            state: zendor_core::listing::ListingState::new(ProductFamily::Wallpapers),
            categories_loading: true,
            debounce_pending: true,
        };

        let view = ListingView::from(&snapshot);
        assert_eq!(view.family, "wallpapers");
        assert!(view.has_catalog);
        assert!(view.filters.loading);
        assert!(view.filters.options.is_empty());
        assert!(!view.filters.show_clear_all);
        assert!(view.grid.cards.is_empty());
    }
}
