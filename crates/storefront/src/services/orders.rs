//! Two-step order submission.
//!
//! The backend has no transaction spanning both tables, so submission is an
//! explicit saga: insert the order row, observe its generated id, then insert
//! the item rows referencing it. A failure after step 1 leaves an order row
//! with no items on the server; that inconsistency is surfaced as a distinct
//! error kind rather than silently reconciled. No automatic retry,
//! compensation, or rollback is performed.

use thiserror::Error;
use tracing::instrument;

use lima_rocha_core::{OrderId, OrderStatus};

use crate::cart::Cart;
use crate::checkout::CheckoutDetails;
use crate::supabase::types::{NewOrder, NewOrderItem, Order};
use crate::supabase::{SupabaseClient, SupabaseError};

/// The order-write surface of the backend.
///
/// Split out as a trait so the saga can be exercised against a stub.
pub trait OrdersBackend {
    /// Insert one order row, returning the generated record.
    fn insert_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, SupabaseError>> + Send;

    /// Insert one row per cart line.
    fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;
}

impl OrdersBackend for SupabaseClient {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, SupabaseError> {
        Self::insert_order(self, order).await
    }

    async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), SupabaseError> {
        Self::insert_order_items(self, items).await
    }
}

/// How a submission failed.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Step 1 failed; nothing was persisted.
    #[error("failed to create order: {0}")]
    Create(#[source] SupabaseError),

    /// Step 2 failed; an order row with no items now exists server-side.
    ///
    /// Callers surface this distinctly so staff can reconcile manually.
    #[error("order {order_id} was created but its items could not be recorded: {source}")]
    Partial {
        order_id: OrderId,
        #[source]
        source: SupabaseError,
    },
}

/// Build the order row from a point-in-time cart snapshot and validated
/// details. Status is always `pending`; the subtotal is computed here.
#[must_use]
pub fn build_order(cart: &Cart, details: &CheckoutDetails) -> NewOrder {
    NewOrder {
        customer_name: details.name.clone(),
        customer_whatsapp: details.whatsapp.clone(),
        delivery_address: details.pickup_address.clone(),
        payment_method: details.payment_method,
        status: OrderStatus::Pending,
        subtotal: cart.subtotal(),
        pickup_date: details.pickup_date,
        pickup_shift: details.pickup_shift,
        pickup_time: details.pickup_time,
    }
}

/// Build one item row per cart line, copying each line's captured unit
/// price so historical orders survive future price changes.
#[must_use]
pub fn build_items(order_id: OrderId, cart: &Cart) -> Vec<NewOrderItem> {
    cart.lines()
        .iter()
        .map(|line| NewOrderItem {
            order_id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        })
        .collect()
}

/// Run the two-step submission.
///
/// The item insert is only attempted after the order insert response is
/// observed. The caller clears the cart and advances the flow only on `Ok`.
///
/// # Errors
///
/// [`OrderError::Create`] if step 1 fails, [`OrderError::Partial`] if step 2
/// fails after the order row exists.
#[instrument(skip(backend, cart, details), fields(lines = cart.lines().len()))]
pub async fn submit_order<B: OrdersBackend>(
    backend: &B,
    cart: &Cart,
    details: &CheckoutDetails,
) -> Result<OrderId, OrderError> {
    let order = backend
        .insert_order(&build_order(cart, details))
        .await
        .map_err(OrderError::Create)?;

    tracing::info!(order_id = %order.id, "order created, recording items");

    let items = build_items(order.id, cart);
    backend
        .insert_order_items(&items)
        .await
        .map_err(|source| OrderError::Partial {
            order_id: order.id,
            source,
        })?;

    Ok(order.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Mutex;

    use chrono::{NaiveDate, NaiveTime};
    use lima_rocha_core::{CategoryId, PaymentMethod, PickupShift, Price, ProductId};

    use crate::supabase::types::Product;

    struct StubBackend {
        fail_order: bool,
        fail_items: bool,
        order_calls: Mutex<u32>,
        item_batches: Mutex<Vec<Vec<NewOrderItem>>>,
    }

    impl StubBackend {
        fn new(fail_order: bool, fail_items: bool) -> Self {
            Self {
                fail_order,
                fail_items,
                order_calls: Mutex::new(0),
                item_batches: Mutex::new(Vec::new()),
            }
        }

        fn backend_error() -> SupabaseError {
            SupabaseError::Api {
                status: 500,
                message: "boom".to_string(),
            }
        }
    }

    impl OrdersBackend for StubBackend {
        async fn insert_order(&self, order: &NewOrder) -> Result<Order, SupabaseError> {
            *self.order_calls.lock().unwrap() += 1;
            if self.fail_order {
                return Err(Self::backend_error());
            }
            Ok(Order {
                id: OrderId::new(42),
                customer_name: order.customer_name.clone(),
                customer_whatsapp: order.customer_whatsapp.clone(),
                delivery_address: order.delivery_address.clone(),
                payment_method: order.payment_method,
                status: order.status,
                subtotal: order.subtotal,
                pickup_date: order.pickup_date,
                pickup_shift: order.pickup_shift,
                pickup_time: order.pickup_time,
                created_at: None,
            })
        }

        async fn insert_order_items(&self, items: &[NewOrderItem]) -> Result<(), SupabaseError> {
            if self.fail_items {
                return Err(Self::backend_error());
            }
            self.item_batches.lock().unwrap().push(items.to_vec());
            Ok(())
        }
    }

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

    fn cart() -> Cart {
        let mut cart = Cart::default();
        let p1 = product(1, 1500);
        cart.add(&p1);
        cart.add(&p1);
        cart.add(&product(2, 850));
        cart
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            name: "Ana Souza".to_string(),
            whatsapp: "(11) 91234-5678".to_string(),
            pickup_address: crate::checkout::PICKUP_ADDRESS.to_string(),
            payment_method: PaymentMethod::from_str("pix").unwrap(),
            pickup_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            pickup_shift: PickupShift::Afternoon,
            pickup_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_build_order_computes_subtotal_and_pending_status() {
        let order = build_order(&cart(), &details());
        assert_eq!(order.subtotal, Price::from_cents(3850));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.delivery_address, crate::checkout::PICKUP_ADDRESS);
    }

    #[test]
    fn test_build_items_one_row_per_line_with_captured_price() {
        let items = build_items(OrderId::new(42), &cart());
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.order_id == OrderId::new(42)));
        let first = &items[0];
        assert_eq!(first.product_id, ProductId::new(1));
        assert_eq!(first.quantity, 2);
        assert_eq!(first.unit_price, Price::from_cents(1500));
    }

    #[tokio::test]
    async fn test_happy_path_submits_both_steps() {
        let backend = StubBackend::new(false, false);
        let cart = cart();

        let order_id = submit_order(&backend, &cart, &details()).await.unwrap();

        assert_eq!(order_id, OrderId::new(42));
        assert_eq!(*backend.order_calls.lock().unwrap(), 1);
        let batches = backend.item_batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        // one row per distinct cart line
        assert_eq!(batches[0].len(), cart.lines().len());
    }

    #[tokio::test]
    async fn test_order_insert_failure_aborts_before_items() {
        let backend = StubBackend::new(true, false);

        let err = submit_order(&backend, &cart(), &details())
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::Create(_)));
        assert!(backend.item_batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_insert_failure_reports_partial_order() {
        let backend = StubBackend::new(false, true);

        let err = submit_order(&backend, &cart(), &details())
            .await
            .unwrap_err();

        match err {
            OrderError::Partial { order_id, .. } => assert_eq!(order_id, OrderId::new(42)),
            OrderError::Create(_) => panic!("expected partial-order error"),
        }
    }
}
