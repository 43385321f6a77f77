//! The order state machine and its two wire vocabularies.
//!
//! An order is in exactly one [`OrderPhase`]. Customers see it as `status`,
//! chefs as `chefStatus`; both are derived from the phase and never stored.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderPhase {
    Pending,
    Accepted,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Rejected,
    Cancelled,
}

/// Values accepted by the generic status path. `rejected` is absent:
/// only a chef's response can reject an order.
const STATUS_ALIASES: [(&str, OrderPhase); 12] = [
    ("pending", OrderPhase::Pending),
    ("confirmed", OrderPhase::Accepted),
    ("accepted", OrderPhase::Accepted),
    ("preparing", OrderPhase::Preparing),
    ("ready", OrderPhase::Ready),
    ("on_the_way", OrderPhase::OutForDelivery),
    ("out_for_delivery", OrderPhase::OutForDelivery),
    ("delivering", OrderPhase::OutForDelivery),
    ("delivered", OrderPhase::Delivered),
    ("completed", OrderPhase::Delivered),
    ("cancelled", OrderPhase::Cancelled),
    ("canceled", OrderPhase::Cancelled),
];

impl OrderPhase {
    /// `(status, chefStatus)`
    fn projection(self) -> (&'static str, &'static str) {
        match self {
            OrderPhase::Pending => ("pending", "pending"),
            OrderPhase::Accepted => ("confirmed", "accepted"),
            OrderPhase::Preparing => ("preparing", "preparing"),
            OrderPhase::Ready => ("ready", "ready"),
            OrderPhase::OutForDelivery => ("on_the_way", "out_for_delivery"),
            OrderPhase::Delivered => ("delivered", "completed"),
            OrderPhase::Rejected => ("cancelled", "rejected"),
            OrderPhase::Cancelled => ("cancelled", "cancelled"),
        }
    }

    /// Customer-facing `status` value.
    pub fn status(self) -> &'static str {
        self.projection().0
    }

    /// Chef-facing `chefStatus` value.
    pub fn chef_status(self) -> &'static str {
        self.projection().1
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderPhase::Delivered | OrderPhase::Rejected | OrderPhase::Cancelled)
    }

    /// True when either wire field of this phase equals `value`.
    pub fn matches(self, value: &str) -> bool {
        self.status() == value || self.chef_status() == value
    }

    pub fn accepted_values() -> impl Iterator<Item = &'static str> {
        STATUS_ALIASES.iter().map(|(name, _)| *name)
    }
}

impl FromStr for OrderPhase {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        STATUS_ALIASES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, phase)| *phase)
            .ok_or_else(|| {
                let valid: Vec<_> = OrderPhase::accepted_values().collect();
                format!("Invalid status. Must be one of: {}", valid.join(", "))
            })
    }
}

impl fmt::Display for OrderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

impl Serialize for OrderPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OrderPhase", 2)?;
        state.serialize_field("status", self.status())?;
        state.serialize_field("chefStatus", self.chef_status())?;
        state.end()
    }
}

/// Preparation steps a chef may move an order to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChefStage {
    Preparing,
    Ready,
    OutForDelivery,
    Completed,
}

impl ChefStage {
    pub fn phase(self) -> OrderPhase {
        match self {
            ChefStage::Preparing => OrderPhase::Preparing,
            ChefStage::Ready => OrderPhase::Ready,
            ChefStage::OutForDelivery => OrderPhase::OutForDelivery,
            ChefStage::Completed => OrderPhase::Delivered,
        }
    }

    /// Confirmation shown to the chef.
    pub fn message(self) -> &'static str {
        match self {
            ChefStage::Preparing => "جاري تحضير الطلب",
            ChefStage::Ready => "الطلب جاهز",
            ChefStage::OutForDelivery => "الطلب في الطريق",
            ChefStage::Completed => "تم إكمال الطلب",
        }
    }
}

impl FromStr for ChefStage {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "preparing" => Ok(ChefStage::Preparing),
            "ready" => Ok(ChefStage::Ready),
            "out_for_delivery" | "delivering" => Ok(ChefStage::OutForDelivery),
            "completed" => Ok(ChefStage::Completed),
            _ => Err("Invalid status. Must be one of: preparing, ready, out_for_delivery, completed".into()),
        }
    }
}

/// A chef's answer to a pending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChefDecision {
    Accept,
    Reject,
}

impl ChefDecision {
    pub fn message(self) -> &'static str {
        match self {
            ChefDecision::Accept => "تم قبول الطلب",
            ChefDecision::Reject => "تم رفض الطلب",
        }
    }
}

impl FromStr for ChefDecision {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "accept" => Ok(ChefDecision::Accept),
            "reject" => Ok(ChefDecision::Reject),
            _ => Err("action must be accept or reject".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_table() {
        let expected = [
            (OrderPhase::Pending, "pending", "pending"),
            (OrderPhase::Accepted, "confirmed", "accepted"),
            (OrderPhase::OutForDelivery, "on_the_way", "out_for_delivery"),
            (OrderPhase::Delivered, "delivered", "completed"),
            (OrderPhase::Rejected, "cancelled", "rejected"),
            (OrderPhase::Cancelled, "cancelled", "cancelled"),
        ];
        for (phase, status, chef_status) in expected {
            assert_eq!(phase.status(), status);
            assert_eq!(phase.chef_status(), chef_status);
        }
    }

    #[test]
    fn test_serializes_both_fields() {
        let value = serde_json::to_value(OrderPhase::Accepted).unwrap();
        assert_eq!(value, json!({"status": "confirmed", "chefStatus": "accepted"}));
    }

    #[test]
    fn test_generic_status_parsing() {
        assert_eq!("confirmed".parse::<OrderPhase>(), Ok(OrderPhase::Accepted));
        assert_eq!("accepted".parse::<OrderPhase>(), Ok(OrderPhase::Accepted));
        assert_eq!("delivering".parse::<OrderPhase>(), Ok(OrderPhase::OutForDelivery));
        assert_eq!("completed".parse::<OrderPhase>(), Ok(OrderPhase::Delivered));
        assert!("rejected".parse::<OrderPhase>().is_err());
        assert!("shipped".parse::<OrderPhase>().is_err());
    }

    #[test]
    fn test_chef_stage_parsing() {
        assert_eq!("completed".parse::<ChefStage>(), Ok(ChefStage::Completed));
        assert_eq!(ChefStage::Completed.phase(), OrderPhase::Delivered);
        assert!("accepted".parse::<ChefStage>().is_err());
        assert!("pending".parse::<ChefStage>().is_err());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(OrderPhase::Delivered.is_terminal());
        assert!(OrderPhase::Rejected.is_terminal());
        assert!(OrderPhase::Cancelled.is_terminal());
        assert!(!OrderPhase::OutForDelivery.is_terminal());
    }
}
