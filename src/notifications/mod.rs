//! Push notifications for order, review and payment events.

pub mod dispatcher;
pub mod events;
pub mod transport;

pub use dispatcher::NotificationDispatcher;
pub use events::*;
pub use transport::*;
