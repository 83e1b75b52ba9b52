//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Home page with the full menu
//! GET  /health          - Liveness check
//! GET  /health/ready    - Readiness check (503 while the menu is unavailable)
//!
//! # Menu (HTMX fragment)
//! GET  /menu            - Menu section, optionally filtered (?category=ID)
//!
//! # Cart (HTMX fragments)
//! GET  /cart/panel      - Cart panel (always lands on the cart view)
//! POST /cart/add        - Add one unit (returns toast, triggers cart-updated)
//! POST /cart/update     - Overwrite quantity (returns panel fragment)
//! POST /cart/remove     - Remove line (returns panel fragment)
//! GET  /cart/count      - Cart count badge (fragment)
//!
//! # Checkout (HTMX fragments inside the cart panel)
//! POST /checkout        - Cart view -> details form
//! POST /checkout/back   - Details form -> cart view
//! POST /checkout/submit - Submit the order, then success view
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod menu;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Liveness probe.
async fn health() -> &'static str {
    "OK"
}

/// Readiness probe: not ready while the startup catalog fetch has failed.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.catalog().is_unavailable() {
        (StatusCode::SERVICE_UNAVAILABLE, "menu unavailable")
    } else {
        (StatusCode::OK, "OK")
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/panel", get(cart::panel))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::begin))
        .route("/back", post(checkout::back))
        .route("/submit", post(checkout::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Health probes
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        // Menu fragment
        .route("/menu", get(menu::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
}
