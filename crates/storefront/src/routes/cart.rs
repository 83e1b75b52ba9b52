//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; handlers mutate it and return the
//! panel or badge fragment plus a `cart-updated` trigger so other elements
//! refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use lima_rocha_core::ProductId;

use crate::cart::Cart;
use crate::checkout::{self, CheckoutStage};
use crate::error::{AppError, Result};
use crate::models::{load_cart, load_stage, save_cart, save_stage};
use crate::routes::menu::PLACEHOLDER_IMAGE_URL;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub requires_prepayment: bool,
    pub prepayment_notice: &'static str,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price.display(),
                    line_total: line.line_total().display(),
                    image_url: line
                        .image_url
                        .clone()
                        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
                })
                .collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.count(),
            requires_prepayment: checkout::requires_prepayment(cart.subtotal()),
            prepayment_notice: checkout::PREPAYMENT_NOTICE,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
}

/// Update cart form data. Quantity arrives as free text from the input.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_view.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart toast fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub message: String,
}

/// Display the cart panel (HTMX).
///
/// Opening the panel always lands on the cart view: any stale `Details` or
/// `Success` stage from a previous visit is discarded here.
#[instrument(skip(session))]
pub async fn panel(session: Session) -> Result<Response> {
    if load_stage(&session).await? != CheckoutStage::Cart {
        save_stage(&session, CheckoutStage::Cart).await?;
    }
    let cart = load_cart(&session).await?;

    Ok(CartPanelTemplate {
        cart: CartView::from(&cart),
    }
    .into_response())
}

/// Add one unit of a product to the cart (HTMX).
///
/// Returns a toast fragment with an HTMX trigger to update the cart badge.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let Some(product) = state.catalog().product(product_id) else {
        return Err(AppError::NotFound(format!("product {product_id}")));
    };

    let mut cart = load_cart(&session).await?;
    cart.add(product);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        ToastTemplate {
            message: format!("{} adicionado ao carrinho", product.name),
        },
    )
        .into_response())
}

/// Overwrite the quantity of a cart line (HTMX).
///
/// The raw input is parsed here: a non-numeric value leaves the cart
/// untouched and the re-rendered panel reverts the field. Zero removes the
/// line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    if let Ok(quantity) = form.quantity.trim().parse::<u32>() {
        cart.set_quantity(ProductId::new(form.product_id), quantity);
        save_cart(&session, &cart).await?;
    } else {
        tracing::debug!(raw = %form.quantity, "ignoring non-numeric quantity");
    }

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartPanelTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartPanelTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lima_rocha_core::{CategoryId, Price};

    use crate::supabase::types::Product;

    #[test]
    fn test_cart_view_falls_back_to_placeholder_image() {
        let mut cart = Cart::default();
        cart.add(&Product {
            id: ProductId::new(1),
            name: "Bolo de Fubá".to_string(),
            description: None,
            price: Price::from_cents(2500),
            category_id: CategoryId::new(2),
            image_url: None,
        });

        let view = CartView::from(&cart);
        assert_eq!(view.items[0].image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(view.subtotal, "R$ 25,00");
    }
}
