//! Two-party conversations with their message history.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
