//! Menu route handler and catalog display views.
//!
//! The product grid is an HTMX fragment: clicking a category chip swaps only
//! the menu section, never the whole page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{Catalog, CategoryFilter};
use crate::state::AppState;
use crate::supabase::types::Product;

/// Fallback image for products without a photo.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/200/200";

/// Category chip display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            image_url: product
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        }
    }
}

/// Build the category chip row for the given filter.
pub fn category_views(catalog: &Catalog, filter: CategoryFilter) -> Vec<CategoryView> {
    catalog
        .categories()
        .iter()
        .map(|category| CategoryView {
            id: category.id.to_string(),
            name: category.name.clone(),
            selected: filter == CategoryFilter::Only(category.id),
        })
        .collect()
}

/// Build the product cards passing the given filter.
pub fn product_views(catalog: &Catalog, filter: CategoryFilter) -> Vec<ProductView> {
    catalog
        .filtered(filter)
        .into_iter()
        .map(ProductView::from)
        .collect()
}

/// Menu query parameters.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// Menu section fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/menu.html")]
pub struct MenuTemplate {
    pub categories: Vec<CategoryView>,
    pub all_selected: bool,
    pub products: Vec<ProductView>,
    pub menu_unavailable: bool,
}

/// Display the menu section, optionally filtered by category (HTMX).
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<MenuQuery>) -> impl IntoResponse {
    let filter = CategoryFilter::parse(query.category.as_deref());
    let catalog = state.catalog();

    MenuTemplate {
        categories: category_views(catalog, filter),
        all_selected: filter == CategoryFilter::All,
        products: product_views(catalog, filter),
        menu_unavailable: catalog.is_unavailable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lima_rocha_core::{CategoryId, Price, ProductId};

    #[test]
    fn test_product_view_falls_back_to_placeholder_image() {
        let product = Product {
            id: ProductId::new(1),
            name: "Pão Francês".to_string(),
            description: None,
            price: Price::from_cents(80),
            category_id: CategoryId::new(1),
            image_url: None,
        };
        assert_eq!(ProductView::from(&product).image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_product_view_keeps_real_image() {
        let product = Product {
            id: ProductId::new(1),
            name: "Pão Francês".to_string(),
            description: None,
            price: Price::from_cents(80),
            category_id: CategoryId::new(1),
            image_url: Some("https://example.com/pao.jpg".to_string()),
        };
        assert_eq!(
            ProductView::from(&product).image_url,
            "https://example.com/pao.jpg"
        );
    }
}
