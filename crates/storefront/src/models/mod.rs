//! Session-stored models.

pub mod session;

pub use session::{load_cart, load_stage, save_cart, save_stage};
