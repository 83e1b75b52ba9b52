//! Session storage for the cart and the checkout panel stage.
//!
//! Both values round-trip as JSON through tower-sessions. Missing or
//! undecodable values fall back to the defaults (empty cart, cart view), so
//! a new visitor and a corrupted session behave identically.

use tower_sessions::Session;

use crate::cart::Cart;
use crate::checkout::CheckoutStage;
use crate::error::AppError;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the checkout panel stage.
    pub const CHECKOUT_STAGE: &str = "checkout_stage";
}

/// Load the cart, defaulting to empty.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session store is unavailable.
pub async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session
        .get::<Cart>(keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        .unwrap_or_default())
}

/// Persist the cart.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session store is unavailable.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session
        .insert(keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
}

/// Load the checkout panel stage, defaulting to the cart view.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session store is unavailable.
pub async fn load_stage(session: &Session) -> Result<CheckoutStage, AppError> {
    Ok(session
        .get::<CheckoutStage>(keys::CHECKOUT_STAGE)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        .unwrap_or_default())
}

/// Persist the checkout panel stage.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session store is unavailable.
pub async fn save_stage(session: &Session, stage: CheckoutStage) -> Result<(), AppError> {
    session
        .insert(keys::CHECKOUT_STAGE, stage)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
}
