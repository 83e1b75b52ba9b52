//! Session-owned shopping cart.
//!
//! The cart round-trips through the session store as JSON, so it only lives
//! for the browser session. Consumers read snapshots; nothing outside this
//! module mutates a line.
//!
//! Invariants:
//! - at most one line per product id
//! - every stored line has quantity >= 1 (a requested quantity of zero
//!   removes the line instead)

use serde::{Deserialize, Serialize};

use lima_rocha_core::{Price, ProductId};

use crate::supabase::types::Product;

/// One cart entry pairing a product with a quantity.
///
/// The name, unit price, and image are captured from the product at add
/// time; the catalog is immutable for the session so they cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The shopping cart for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of the given product.
    ///
    /// An existing line is incremented; otherwise a new line with quantity 1
    /// is appended. Always succeeds; a line already at `u32::MAX` stays
    /// there rather than wrapping to a quantity-0 line.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
            quantity: 1,
        });
    }

    /// Overwrite the quantity for a line.
    ///
    /// A quantity of zero removes the line; there is no upper bound.
    /// No-op if no line exists for the product.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Delete the line for a product, if present.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Sum of `price * quantity` over all lines. Derived, never stored.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total item count over all lines, for the badge. Saturates instead of
    /// overflowing, since quantities are unbounded.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .map(|line| line.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Empty the cart. Only called after a confirmed successful submission.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lima_rocha_core::CategoryId;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product {id}"),
            description: None,
            price: Price::from_cents(cents),
            category_id: CategoryId::new(1),
            image_url: None,
        }
    }

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut cart = Cart::default();
        let p = product(1, 1500);
        for _ in 0..5 {
            cart.add(&p);
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_distinct_products_creates_lines() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.add(&product(2, 850));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.set_quantity(ProductId::new(1), 7);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.set_quantity(ProductId::new(1), 0);
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_product_is_noop() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.set_quantity(ProductId::new(9), 3);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_at_max_quantity_saturates() {
        let mut cart = Cart::default();
        let p = product(1, 1500);
        cart.add(&p);
        cart.set_quantity(ProductId::new(1), u32::MAX);
        cart.add(&p);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_count_saturates_across_lines() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.set_quantity(ProductId::new(1), u32::MAX);
        cart.add(&product(2, 850));
        cart.set_quantity(ProductId::new(2), 7);
        assert_eq!(cart.count(), u32::MAX);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::default();
        cart.remove(ProductId::new(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_is_recomputed() {
        // Product{id=1, price=15.00} x2 and Product{id=2, price=8.50} x1
        let mut cart = Cart::default();
        let p1 = product(1, 1500);
        cart.add(&p1);
        cart.add(&p1);
        cart.add(&product(2, 850));
        assert_eq!(cart.subtotal(), Price::from_cents(3850));
        assert_eq!(cart.count(), 3);

        cart.set_quantity(ProductId::new(2), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(5550));
    }

    #[test]
    fn test_clear_resets_derived_values() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.add(&product(2, 850));
        cart.clear();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unit_price_captured_at_add_time() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        // A later catalog price change must not affect the stored line.
        assert_eq!(cart.lines()[0].unit_price, Price::from_cents(1500));
    }

    #[test]
    fn test_cart_serde_round_trip() {
        let mut cart = Cart::default();
        cart.add(&product(1, 1500));
        cart.set_quantity(ProductId::new(1), 2);
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
