//! User accounts: profile edits, bans, push registration and notification preferences.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
