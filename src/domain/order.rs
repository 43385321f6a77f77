use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order_actor::OrderPhase;

/// A placed order. Monetary fields are fixed at creation.
///
/// `phase` serializes into the two wire fields `status` and `chefStatus`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    /// Chef of the first line item; receives new-order and payment notices.
    pub chef_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub delivery_address: String,
    pub delivery_notes: String,
    pub payment_method: String,
    #[serde(flatten)]
    pub phase: OrderPhase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub preparing_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub out_for_delivery_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub payment_status: String,
    pub payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub refund_requested: bool,
    pub refund_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub dish_id: String,
    #[serde(default)]
    pub dish_name: String,
    #[serde(default)]
    pub dish_image: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub cooker_id: String,
    #[serde(default)]
    pub cooker_name: String,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Checkout request: everything needed to derive an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: String,
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
    pub delivery_notes: String,
    pub payment_method: String,
    pub delivery_fee: f64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_customer(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// True when `user_id` is the order's chef or the chef of any line item.
    pub fn is_assigned_chef(&self, user_id: &str) -> bool {
        if user_id.is_empty() {
            return false;
        }
        self.chef_id == user_id || self.items.iter().any(|item| item.cooker_id == user_id)
    }

    pub fn contains_dish(&self, dish_id: &str) -> bool {
        self.items.iter().any(|item| item.dish_id == dish_id)
    }
}
