use chrono::{DateTime, Utc};
use serde::Serialize;

pub const CURRENCY: &str = "TND";
pub const CASH: &str = "cash";

/// Record of a payment confirmation against an order. Append-only.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub order_id: String,
    pub user_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Customer request for money back, awaiting approval.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub id: String,
    pub order_id: String,
    pub user_id: String,
    pub amount: f64,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RefundCreate {
    pub order_id: String,
    pub user_id: String,
    pub amount: f64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

pub const PAYMENT_METHODS: [PaymentMethod; 2] = [
    PaymentMethod {
        id: "cash",
        name: "Cash on Delivery",
        icon: "💵",
        enabled: true,
        description: "Pay when you receive your order",
    },
    PaymentMethod {
        id: "card",
        name: "Credit/Debit Card",
        icon: "💳",
        enabled: true,
        description: "Pay securely by card",
    },
];

/// Status written on the order and on the payment record for a confirmation.
/// Cash stays pending until delivery.
pub fn settlement_status(method: &str) -> (&'static str, &'static str) {
    if method == CASH {
        ("pending", "pending")
    } else {
        ("paid", "completed")
    }
}
