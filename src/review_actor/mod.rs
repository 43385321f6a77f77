//! Reviews and the dish rating aggregate they feed.

mod actions;
pub mod aggregate;
pub mod entity;
pub mod error;

pub use actions::*;
pub use aggregate::*;
pub use error::*;
