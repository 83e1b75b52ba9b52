//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `orders` - two-step order submission against the backend

pub mod orders;
