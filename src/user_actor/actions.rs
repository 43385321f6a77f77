use chrono::{DateTime, Utc};

use crate::domain::{Favorite, NewAddress, NotificationSettings};

/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Blocks the account, recording why and when.
    Ban { reason: String, at: DateTime<Utc> },
    Unban { at: DateTime<Utc> },
    /// Stores the device token push notifications are delivered to.
    RegisterPushToken { token: String, at: DateTime<Utc> },
    UpdateNotificationSettings { settings: NotificationSettings, at: DateTime<Utc> },
    /// Marks the account as owning a chef profile.
    PromoteToChef { at: DateTime<Utc> },
    GrantAdmin { at: DateTime<Utc> },
    AddAddress { address: NewAddress, at: DateTime<Utc> },
    /// Removing an unknown address id is not an error.
    RemoveAddress { address_id: String, at: DateTime<Utc> },
    /// Ignored when the dish is already a favorite.
    AddFavorite { favorite: Favorite },
    RemoveFavorite { dish_id: String, at: DateTime<Utc> },
}
