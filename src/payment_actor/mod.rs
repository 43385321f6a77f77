//! Payment confirmations and refund requests.

pub mod entity;
pub mod error;

pub use error::*;
