//! Orders and their lifecycle: the phase machine, its wire projections,
//! and who may move an order between phases.

mod actions;
pub mod entity;
pub mod error;
pub mod policy;
pub mod status;
pub mod validation;

pub use actions::*;
pub use error::*;
pub use status::*;
