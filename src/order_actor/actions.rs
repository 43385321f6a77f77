use chrono::{DateTime, Utc};

use crate::domain::Order;
use super::status::{ChefDecision, ChefStage, OrderPhase};

/// Custom actions for Order entities. Each one checks the caller's right to
/// perform it inside the owning actor, so a refused action leaves the order untouched.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Assigned chef accepts or rejects a pending order.
    Respond {
        chef_id: String,
        decision: ChefDecision,
        reason: String,
        at: DateTime<Utc>,
    },
    /// Assigned chef moves the order to a preparation stage.
    Advance {
        chef_id: String,
        stage: ChefStage,
        at: DateTime<Utc>,
    },
    /// Customer cancels while the order is still pending.
    CancelPending { user_id: String, at: DateTime<Utc> },
    /// Generic status write used by customers, chefs and admins.
    SetStatus {
        actor_id: String,
        is_registered_chef: bool,
        is_admin: bool,
        phase: OrderPhase,
        at: DateTime<Utc>,
    },
    RecordPayment {
        method: String,
        payment_id: Option<String>,
        payment_status: String,
        at: DateTime<Utc>,
    },
    /// Customer asks for money back; links the refund request.
    RequestRefund {
        user_id: String,
        refund_id: String,
        at: DateTime<Utc>,
    },
}

/// Result of every order action: the stored order plus the phase it left.
#[derive(Debug, Clone)]
pub struct OrderTransition {
    pub previous: OrderPhase,
    pub order: Order,
}

impl OrderTransition {
    pub fn changed_phase(&self) -> bool {
        self.previous != self.order.phase
    }

    /// Whether this transition gets a notification. Only creation announces
    /// a pending order, so moving back to pending stays silent.
    pub fn is_announced(&self) -> bool {
        self.changed_phase() && self.order.phase != OrderPhase::Pending
    }
}
