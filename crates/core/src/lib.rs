//! Lima Rocha Core - Shared types library.
//!
//! This crate provides common types used across the Lima Rocha storefront:
//! newtype IDs, BRL prices, order status, and checkout enums.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
