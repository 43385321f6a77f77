use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "عام";
pub const DEFAULT_SERVING_SIZE: &str = "1 شخص";
pub const DEFAULT_PREPARATION_MINUTES: u32 = 30;

/// A menu entry owned by exactly one chef.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub cooker_id: String,
    pub cooker_name: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub ingredients: Vec<String>,
    pub preparation_time: u32,
    pub serving_size: String,
    pub is_available: bool,
    pub is_spicy: bool,
    pub is_vegetarian: bool,
    pub rating: f64,
    pub review_count: u64,
    pub orders_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a chef supplies when adding a dish. Owner fields are filled in server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishCreate {
    #[serde(skip)]
    pub cooker_id: String,
    #[serde(skip)]
    pub cooker_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    pub category: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub preparation_time: Option<u32>,
    pub serving_size: Option<String>,
    #[serde(default)]
    pub is_spicy: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial dish update from the owning chef.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
    pub preparation_time: Option<u32>,
    pub serving_size: Option<String>,
    pub is_spicy: Option<bool>,
    pub is_vegetarian: Option<bool>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
}

pub const CATEGORIES: [Category; 8] = [
    Category { id: "seafood", name: "بحري", icon: "🦐" },
    Category { id: "couscous", name: "كسكسي", icon: "🍲" },
    Category { id: "pasta", name: "مقرونة", icon: "🍝" },
    Category { id: "traditional", name: "تقليدي", icon: "🥘" },
    Category { id: "grilled", name: "مشوي", icon: "🍖" },
    Category { id: "salads", name: "سلطات", icon: "🥗" },
    Category { id: "desserts", name: "حلويات", icon: "🍰" },
    Category { id: "drinks", name: "مشروبات", icon: "🥤" },
];

/// Dish as shown in listings, with the owning chef's public details attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishListing {
    #[serde(flatten)]
    pub dish: Dish,
    pub cooker_image: String,
    pub cooker_rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooker_is_active: Option<bool>,
}
