use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A marketplace account, keyed by the identity provider's stable uid.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub profile_image: String,
    pub role: UserRole,
    pub is_admin: bool,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
    pub addresses: Vec<Address>,
    pub favorites: Vec<Favorite>,
    pub notification_settings: NotificationSettings,
    pub fcm_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Chef,
    Admin,
}

pub const DEFAULT_ADDRESS_LABEL: &str = "المنزل";
const ADDRESS_ID_PREFIX: &str = "addr_";

/// A saved delivery address. At most one per user is the default.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub label: String,
    pub address: String,
    pub city: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of an add-address request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub label: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    /// Absent means "default if it is the first address".
    pub is_default: Option<bool>,
}

/// A dish the user bookmarked, with the name and image they saw.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub dish_id: String,
    pub dish_name: String,
    pub dish_image: String,
    pub added_at: DateTime<Utc>,
}

/// Per-user opt-outs, one flag per notification category. Absent flags are on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "enabled")]
    pub order_updates: bool,
    #[serde(default = "enabled")]
    pub new_messages: bool,
    #[serde(default = "enabled")]
    pub promotions: bool,
    #[serde(default = "enabled")]
    pub reviews: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            order_updates: true,
            new_messages: true,
            promotions: true,
            reviews: true,
        }
    }
}

impl User {
    /// Fresh customer account.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            profile_image: String::new(),
            role: UserRole::Customer,
            is_admin: false,
            is_banned: false,
            ban_reason: None,
            banned_at: None,
            addresses: Vec::new(),
            favorites: Vec::new(),
            notification_settings: NotificationSettings::default(),
            fcm_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends an address and returns it. Ids are `addr_<n>`, one past the
    /// highest id in use, so a deleted id is never handed out again while a
    /// later one survives.
    pub fn add_address(&mut self, new: NewAddress, now: DateTime<Utc>) -> Address {
        let next = self
            .addresses
            .iter()
            .filter_map(|a| a.id.strip_prefix(ADDRESS_ID_PREFIX)?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let is_default = new.is_default.unwrap_or(self.addresses.is_empty());
        if is_default {
            for existing in &mut self.addresses {
                existing.is_default = false;
            }
        }
        let address = Address {
            id: format!("{}{}", ADDRESS_ID_PREFIX, next),
            label: new.label.unwrap_or_else(|| DEFAULT_ADDRESS_LABEL.to_string()),
            address: new.address,
            city: new.city,
            is_default,
            created_at: now,
        };
        self.addresses.push(address.clone());
        address
    }

    pub fn is_favorite(&self, dish_id: &str) -> bool {
        self.favorites.iter().any(|f| f.dish_id == dish_id)
    }

    /// Name to show other people, falling back to the email when no name was given.
    pub fn display_name(&self) -> Option<&str> {
        if !self.name.trim().is_empty() {
            Some(&self.name)
        } else if !self.email.trim().is_empty() {
            Some(&self.email)
        } else {
            None
        }
    }
}

/// Partial profile update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_address(address: &str, is_default: Option<bool>) -> NewAddress {
        NewAddress { address: address.into(), is_default, ..Default::default() }
    }

    #[test]
    fn test_first_address_becomes_default() {
        let now = Utc::now();
        let mut user = User::new("u1", "Salma", "", now);

        let home = user.add_address(new_address("12 Rue de Marseille", None), now);
        assert_eq!(home.id, "addr_1");
        assert_eq!(home.label, DEFAULT_ADDRESS_LABEL);
        assert!(home.is_default);

        let work = user.add_address(new_address("Lac 2", None), now);
        assert!(!work.is_default);
        assert!(user.addresses[0].is_default);
    }

    #[test]
    fn test_new_default_unsets_the_others() {
        let now = Utc::now();
        let mut user = User::new("u1", "Salma", "", now);
        user.add_address(new_address("A", None), now);
        user.add_address(new_address("B", None), now);
        user.add_address(new_address("C", Some(true)), now);

        let defaults: Vec<_> = user.addresses.iter().filter(|a| a.is_default).map(|a| a.id.as_str()).collect();
        assert_eq!(defaults, vec!["addr_3"]);
    }

    #[test]
    fn test_address_ids_survive_deletion() {
        let now = Utc::now();
        let mut user = User::new("u1", "Salma", "", now);
        user.add_address(new_address("A", None), now);
        user.add_address(new_address("B", None), now);
        user.addresses.retain(|a| a.id != "addr_1");

        assert_eq!(user.add_address(new_address("C", None), now).id, "addr_3");
    }
}
