//! Chef profiles: availability, verification and running earnings.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
