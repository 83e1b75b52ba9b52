//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CategoryFilter;
use crate::checkout::{LEAD_TIME_NOTICE, PICKUP_ADDRESS, PREPAYMENT_NOTICE};
use crate::error::Result;
use crate::filters;
use crate::models::load_cart;
use crate::routes::menu::{CategoryView, ProductView, category_views, product_views};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryView>,
    pub all_selected: bool,
    pub products: Vec<ProductView>,
    pub menu_unavailable: bool,
    pub cart_count: u32,
    pub pickup_address: &'static str,
    pub lead_time_notice: &'static str,
    pub prepayment_notice: &'static str,
}

/// Display the home page with the full unfiltered menu.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    let catalog = state.catalog();

    Ok(HomeTemplate {
        categories: category_views(catalog, CategoryFilter::All),
        all_selected: true,
        products: product_views(catalog, CategoryFilter::All),
        menu_unavailable: catalog.is_unavailable(),
        cart_count: cart.count(),
        pickup_address: PICKUP_ADDRESS,
        lead_time_notice: LEAD_TIME_NOTICE,
        prepayment_notice: PREPAYMENT_NOTICE,
    })
}
