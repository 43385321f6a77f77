//! Dishes: chef-owned menu entries with review and sales counters.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
