//! Per-user carts, keyed by user id.

pub mod entity;
pub mod error;

pub use error::*;
