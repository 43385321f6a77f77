use chrono::{DateTime, Utc};

/// Custom actions for Chef entities.
#[derive(Debug, Clone)]
pub enum ChefAction {
    /// Toggles whether the chef is accepting orders.
    SetAvailability { active: bool, at: DateTime<Utc> },
    /// Admin approval of the profile.
    Verify { at: DateTime<Utc> },
    /// Credits a completed order: earnings grow by `earnings`, order count by one.
    RecordCompletedOrder { earnings: f64, at: DateTime<Utc> },
}
