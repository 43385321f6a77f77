use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cook selling dishes on the marketplace. Keyed by the owning user's id.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chef {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub bio: String,
    pub phone: String,
    pub specialties: Vec<String>,
    pub location: String,
    pub address: String,
    pub profile_image: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub rating: f64,
    pub total_orders: u64,
    pub total_earnings: f64,
    pub working_hours: WorkingHours,
    pub delivery_settings: DeliverySettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDay {
    pub open: String,
    pub close: String,
    pub is_open: bool,
}

impl WorkingDay {
    fn regular(is_open: bool) -> Self {
        Self {
            open: "09:00".to_string(),
            close: "21:00".to_string(),
            is_open,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHours {
    pub monday: WorkingDay,
    pub tuesday: WorkingDay,
    pub wednesday: WorkingDay,
    pub thursday: WorkingDay,
    pub friday: WorkingDay,
    pub saturday: WorkingDay,
    pub sunday: WorkingDay,
}

/// Monday to Saturday 09:00-21:00, closed on Sunday.
impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            monday: WorkingDay::regular(true),
            tuesday: WorkingDay::regular(true),
            wednesday: WorkingDay::regular(true),
            thursday: WorkingDay::regular(true),
            friday: WorkingDay::regular(true),
            saturday: WorkingDay::regular(true),
            sunday: WorkingDay::regular(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    pub offers_delivery: bool,
    pub delivery_fee: f64,
    /// Kilometres.
    pub delivery_radius: f64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            offers_delivery: true,
            delivery_fee: 3.0,
            delivery_radius: 10.0,
        }
    }
}

/// Profile fields supplied at chef registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChefRegistration {
    pub name: String,
    pub bio: String,
    pub phone: String,
    pub specialties: Vec<String>,
    pub location: String,
    pub address: String,
    pub profile_image: String,
    pub working_hours: Option<WorkingHours>,
}

impl Chef {
    /// Builds the chef document for `user_id`: active, unverified, no history yet.
    pub fn register(user_id: impl Into<String>, registration: ChefRegistration, now: DateTime<Utc>) -> Self {
        let user_id = user_id.into();
        Self {
            id: user_id.clone(),
            user_id,
            name: registration.name,
            bio: registration.bio,
            phone: registration.phone,
            specialties: registration.specialties,
            location: registration.location,
            address: registration.address,
            profile_image: registration.profile_image,
            is_active: true,
            is_verified: false,
            verified_at: None,
            rating: 0.0,
            total_orders: 0,
            total_earnings: 0.0,
            working_hours: registration.working_hours.unwrap_or_default(),
            delivery_settings: DeliverySettings::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial chef profile update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub working_hours: Option<WorkingHours>,
    pub delivery_settings: Option<DeliverySettings>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}
