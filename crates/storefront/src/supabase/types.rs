//! Row types for the Supabase tables the storefront touches.
//!
//! Reads: `categories`, `products`. Writes: `orders`, `order_items`.
//! Extra backend columns (timestamps etc.) are ignored on deserialization.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use lima_rocha_core::{
    CategoryId, OrderId, OrderStatus, PaymentMethod, PickupShift, Price, ProductId,
};

/// A product category. Read-only, immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A product on the menu. Read-only, sourced entirely from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    pub category_id: CategoryId,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Payload for inserting one row into `orders`.
///
/// Customer, schedule, and payment fields are denormalized onto the row;
/// the subtotal is computed from the cart at submission time.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_whatsapp: String,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub subtotal: Price,
    pub pickup_date: NaiveDate,
    pub pickup_shift: PickupShift,
    pub pickup_time: NaiveTime,
}

/// An `orders` row as returned by `Prefer: return=representation`.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_whatsapp: String,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub subtotal: Price,
    pub pickup_date: NaiveDate,
    pub pickup_shift: PickupShift,
    pub pickup_time: NaiveTime,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for inserting one row into `order_items`.
///
/// The unit price is copied from the cart line at submission time so
/// historical orders are unaffected by later price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Price,
}
