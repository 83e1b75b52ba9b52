//! Core types for the Lima Rocha storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod checkout;
pub mod id;
pub mod price;
pub mod status;

pub use checkout::{PaymentMethod, PickupShift};
pub use id::*;
pub use price::Price;
pub use status::OrderStatus;
