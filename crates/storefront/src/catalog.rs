//! Catalog loaded once at startup and held immutable for the process.
//!
//! The menu is small enough to fetch in one shot, so there is no caching
//! layer, no refresh, and no pagination. If either read fails the storefront
//! still serves, with empty lists and a "menu failed to load" notice.

use lima_rocha_core::{CategoryId, ProductId};
use tracing::instrument;

use crate::supabase::types::{Category, Product};
use crate::supabase::{SupabaseClient, SupabaseError};

/// The category selection applied to the product grid.
///
/// `All` is the sentinel for "no filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    /// Parse a query-string value. `None`, `"all"`, and anything
    /// non-numeric select everything.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) => value
                .parse::<i64>()
                .map_or(Self::All, |id| Self::Only(CategoryId::new(id))),
            None => Self::All,
        }
    }

    /// Whether the given product passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => product.category_id == *id,
        }
    }
}

/// The categories and products on offer, fetched once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
    unavailable: bool,
}

impl Catalog {
    /// Build a catalog from already-fetched lists.
    #[must_use]
    pub const fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            categories,
            products,
            unavailable: false,
        }
    }

    /// The degraded catalog used when the menu failed to load.
    #[must_use]
    pub const fn empty_unavailable() -> Self {
        Self {
            categories: Vec::new(),
            products: Vec::new(),
            unavailable: true,
        }
    }

    /// Fetch categories and products from the backend.
    ///
    /// Never fails: on error the degraded catalog is returned and the
    /// failure is logged. No retry is scheduled - the operator restarts the
    /// process once the backend is reachable again.
    #[instrument(skip(client))]
    pub async fn load(client: &SupabaseClient) -> Self {
        let fetched: Result<_, SupabaseError> = async {
            let categories = client.list_categories().await?;
            let products = client.list_products().await?;
            Ok((categories, products))
        }
        .await;

        match fetched {
            Ok((categories, products)) => {
                tracing::info!(
                    categories = categories.len(),
                    products = products.len(),
                    "catalog loaded"
                );
                Self::new(categories, products)
            }
            Err(e) => {
                tracing::warn!("failed to load catalog, serving degraded: {e}");
                Self::empty_unavailable()
            }
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whether the startup fetch failed and the menu notice should show.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Pure derived view: the products passing the given filter.
    #[must_use]
    pub fn filtered(&self, filter: CategoryFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lima_rocha_core::Price;

    fn product(id: i64, category_id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product {id}"),
            description: None,
            price: Price::from_cents(1000),
            category_id: CategoryId::new(category_id),
            image_url: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Category {
                    id: CategoryId::new(1),
                    name: "Pães".to_string(),
                },
                Category {
                    id: CategoryId::new(2),
                    name: "Doces".to_string(),
                },
            ],
            vec![product(10, 1), product(11, 1), product(12, 2)],
        )
    }

    #[test]
    fn test_filter_all_returns_everything() {
        let catalog = catalog();
        assert_eq!(catalog.filtered(CategoryFilter::All).len(), 3);
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = catalog();
        let filtered = catalog.filtered(CategoryFilter::Only(CategoryId::new(1)));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| p.category_id == CategoryId::new(1)));
    }

    #[test]
    fn test_filter_unknown_category_is_empty() {
        let catalog = catalog();
        assert!(
            catalog
                .filtered(CategoryFilter::Only(CategoryId::new(99)))
                .is_empty()
        );
    }

    #[test]
    fn test_parse_sentinel_and_ids() {
        assert_eq!(CategoryFilter::parse(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(Some("all")), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(Some("garbage")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(Some("2")),
            CategoryFilter::Only(CategoryId::new(2))
        );
    }

    #[test]
    fn test_unavailable_catalog_is_empty_but_serves() {
        let catalog = Catalog::empty_unavailable();
        assert!(catalog.is_unavailable());
        assert!(catalog.categories().is_empty());
        assert!(catalog.filtered(CategoryFilter::All).is_empty());
    }

    #[test]
    fn test_product_lookup() {
        let catalog = catalog();
        assert!(catalog.product(ProductId::new(11)).is_some());
        assert!(catalog.product(ProductId::new(99)).is_none());
    }
}
