use chrono::{DateTime, Utc};

/// Custom actions for Dish entities.
#[derive(Debug, Clone)]
pub enum DishAction {
    SetAvailability { available: bool, at: DateTime<Utc> },
    /// Overwrites the review aggregate with a freshly computed one.
    SetRating { rating: f64, review_count: u64 },
    /// Counts units sold in a completed order.
    AddOrders { quantity: u64 },
}
