//! Documents stored by the marketplace, plus the request shapes that create or patch them.

pub mod cart;
pub mod chef;
pub mod conversation;
pub mod dish;
pub mod order;
pub mod payment;
pub mod review;
pub mod user;

pub use cart::*;
pub use chef::*;
pub use conversation::*;
pub use dish::*;
pub use order::*;
pub use payment::*;
pub use review::*;
pub use user::*;

/// Rounds half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to whole cents.
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
