use chrono::{DateTime, Utc};

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{round_money, Order, OrderCreate};
use super::actions::{OrderAction, OrderTransition};
use super::policy::authorize;
use super::status::{ChefDecision, OrderPhase};
use super::validation::{subtotal, validate_new_order};

const UNAUTHORIZED: &str = "Unauthorized";

impl Order {
    /// Moves to `phase` and stamps the matching timestamp.
    fn enter(&mut self, phase: OrderPhase, at: DateTime<Utc>) {
        match phase {
            OrderPhase::Pending => {}
            OrderPhase::Accepted => self.accepted_at = Some(at),
            OrderPhase::Preparing => self.preparing_at = Some(at),
            OrderPhase::Ready => self.ready_at = Some(at),
            OrderPhase::OutForDelivery => self.out_for_delivery_at = Some(at),
            OrderPhase::Delivered => self.completed_at = Some(at),
            OrderPhase::Rejected => self.rejected_at = Some(at),
            OrderPhase::Cancelled => self.cancelled_at = Some(at),
        }
        self.phase = phase;
        self.updated_at = at;
    }

    fn ensure_open(&self) -> Result<(), FrameworkError> {
        if self.phase.is_terminal() {
            return Err(FrameworkError::Validation(format!(
                "Order is already {}",
                self.phase.chef_status()
            )));
        }
        Ok(())
    }

    fn ensure_assigned_chef(&self, chef_id: &str) -> Result<(), FrameworkError> {
        if !self.is_assigned_chef(chef_id) {
            return Err(FrameworkError::Forbidden(UNAUTHORIZED.into()));
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type UpdateParams = std::convert::Infallible;
    type Action = OrderAction;
    type ActionResult = OrderTransition;

    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &String {
        &self.id
    }

    /// Derives a pending order from a checkout request.
    ///
    /// `subtotal` is the sum of line totals, `total = subtotal + deliveryFee`.
    /// Neither is ever recomputed afterwards.
    ///
    /// # Errors
    /// Empty item list, blank address, zero quantities or negative prices.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, FrameworkError> {
        validate_new_order(&params).map_err(FrameworkError::Validation)?;

        let subtotal = subtotal(&params.items);
        let chef_id = params
            .items
            .first()
            .map(|item| item.cooker_id.clone())
            .unwrap_or_default();
        let payment_method = if params.payment_method.trim().is_empty() {
            "cash".to_string()
        } else {
            params.payment_method
        };

        Ok(Self {
            id,
            user_id: params.user_id,
            user_email: params.user_email,
            chef_id,
            items: params.items,
            subtotal,
            delivery_fee: params.delivery_fee,
            total: round_money(subtotal + params.delivery_fee),
            delivery_address: params.delivery_address,
            delivery_notes: params.delivery_notes,
            payment_method,
            phase: OrderPhase::Pending,
            created_at: params.created_at,
            updated_at: params.created_at,
            accepted_at: None,
            rejected_at: None,
            rejection_reason: None,
            preparing_at: None,
            ready_at: None,
            out_for_delivery_at: None,
            completed_at: None,
            cancelled_at: None,
            cancelled_by: None,
            payment_status: "pending".to_string(),
            payment_id: None,
            paid_at: None,
            refund_requested: false,
            refund_id: None,
        })
    }

    /// Orders only change through [`OrderAction`]s.
    fn on_update(&mut self, params: std::convert::Infallible) -> Result<(), FrameworkError> {
        match params {}
    }

    /// Applies one lifecycle step. Every check runs before the first write.
    fn handle_action(&mut self, action: OrderAction) -> Result<OrderTransition, FrameworkError> {
        let previous = self.phase;
        match action {
            OrderAction::Respond { chef_id, decision, reason, at } => {
                self.ensure_assigned_chef(&chef_id)?;
                if self.phase != OrderPhase::Pending {
                    return Err(FrameworkError::Validation(format!(
                        "Order is already {}",
                        self.phase.chef_status()
                    )));
                }
                match decision {
                    ChefDecision::Accept => self.enter(OrderPhase::Accepted, at),
                    ChefDecision::Reject => {
                        self.rejection_reason = Some(reason);
                        self.cancelled_by = Some(chef_id);
                        self.enter(OrderPhase::Rejected, at);
                    }
                }
            }
            OrderAction::Advance { chef_id, stage, at } => {
                self.ensure_assigned_chef(&chef_id)?;
                self.ensure_open()?;
                self.enter(stage.phase(), at);
            }
            OrderAction::CancelPending { user_id, at } => {
                if !self.is_customer(&user_id) {
                    return Err(FrameworkError::Forbidden(UNAUTHORIZED.into()));
                }
                if self.phase != OrderPhase::Pending {
                    return Err(FrameworkError::Validation("Only pending orders can be cancelled".into()));
                }
                self.cancelled_by = Some(user_id);
                self.enter(OrderPhase::Cancelled, at);
            }
            OrderAction::SetStatus { actor_id, is_registered_chef, is_admin, phase, at } => {
                let role = authorize(self, &actor_id, is_registered_chef, is_admin);
                if !role.may_set_status() {
                    return Err(FrameworkError::Forbidden(UNAUTHORIZED.into()));
                }
                if phase == OrderPhase::Rejected {
                    return Err(FrameworkError::Validation("Only the assigned chef can reject an order".into()));
                }
                self.ensure_open()?;
                if phase == OrderPhase::Cancelled {
                    self.cancelled_by = Some(actor_id);
                }
                self.enter(phase, at);
            }
            OrderAction::RecordPayment { method, payment_id, payment_status, at } => {
                self.paid_at = (payment_status == "paid").then_some(at);
                self.payment_method = method;
                self.payment_id = payment_id;
                self.payment_status = payment_status;
                self.updated_at = at;
            }
            OrderAction::RequestRefund { user_id, refund_id, at } => {
                if !self.is_customer(&user_id) {
                    return Err(FrameworkError::Forbidden(UNAUTHORIZED.into()));
                }
                if self.phase.is_terminal() {
                    return Err(FrameworkError::Validation("Order not eligible for refund".into()));
                }
                self.refund_requested = true;
                self.refund_id = Some(refund_id);
                self.updated_at = at;
            }
        }
        Ok(OrderTransition { previous, order: self.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderItem;
    use crate::order_actor::ChefStage;

    fn item(dish_id: &str, cooker_id: &str, price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            dish_id: dish_id.into(),
            dish_name: String::new(),
            dish_image: String::new(),
            price,
            quantity,
            cooker_id: cooker_id.into(),
            cooker_name: String::new(),
        }
    }

    fn pending(items: Vec<OrderItem>) -> Order {
        let params = OrderCreate {
            user_id: "cust_1".into(),
            user_email: "cust@example.com".into(),
            items,
            delivery_address: "123 St".into(),
            delivery_notes: String::new(),
            payment_method: String::new(),
            delivery_fee: 3.0,
            created_at: Utc::now(),
        };
        Order::from_create_params("order_1".into(), params).unwrap()
    }

    #[test]
    fn test_creation_derives_totals() {
        let order = pending(vec![item("D1", "chef_1", 18.5, 2)]);
        assert_eq!(order.subtotal, 37.0);
        assert_eq!(order.delivery_fee, 3.0);
        assert_eq!(order.total, 40.0);
        assert_eq!(order.phase, OrderPhase::Pending);
        assert_eq!(order.chef_id, "chef_1");
        assert_eq!(order.payment_method, "cash");
    }

    #[test]
    fn test_foreign_chef_cannot_touch_order() {
        let mut order = pending(vec![item("D1", "chef_1", 10.0, 1)]);
        let before = order.clone();
        let now = Utc::now();

        let respond = order.handle_action(OrderAction::Respond {
            chef_id: "chef_2".into(),
            decision: ChefDecision::Accept,
            reason: String::new(),
            at: now,
        });
        assert_eq!(respond.unwrap_err(), FrameworkError::Forbidden("Unauthorized".into()));

        let advance = order.handle_action(OrderAction::Advance {
            chef_id: "chef_2".into(),
            stage: ChefStage::Preparing,
            at: now,
        });
        assert!(matches!(advance, Err(FrameworkError::Forbidden(_))));
        assert_eq!(order, before);
    }

    #[test]
    fn test_any_line_item_chef_is_assigned() {
        let mut order = pending(vec![item("D1", "chef_1", 10.0, 1), item("D2", "chef_2", 5.0, 1)]);
        let result = order
            .handle_action(OrderAction::Advance {
                chef_id: "chef_2".into(),
                stage: ChefStage::Preparing,
                at: Utc::now(),
            })
            .unwrap();
        assert_eq!(result.previous, OrderPhase::Pending);
        assert_eq!(result.order.phase, OrderPhase::Preparing);
        assert!(result.order.preparing_at.is_some());
    }

    #[test]
    fn test_reject_records_reason_and_actor() {
        let mut order = pending(vec![item("D1", "chef_1", 10.0, 1)]);
        let result = order
            .handle_action(OrderAction::Respond {
                chef_id: "chef_1".into(),
                decision: ChefDecision::Reject,
                reason: "Out of semolina".into(),
                at: Utc::now(),
            })
            .unwrap();
        assert_eq!(result.order.phase.status(), "cancelled");
        assert_eq!(result.order.phase.chef_status(), "rejected");
        assert_eq!(result.order.rejection_reason.as_deref(), Some("Out of semolina"));
        assert_eq!(result.order.cancelled_by.as_deref(), Some("chef_1"));

        let again = order.handle_action(OrderAction::Respond {
            chef_id: "chef_1".into(),
            decision: ChefDecision::Accept,
            reason: String::new(),
            at: Utc::now(),
        });
        assert!(matches!(again, Err(FrameworkError::Validation(_))));
    }

    #[test]
    fn test_customer_cancel_window() {
        let now = Utc::now();
        let mut order = pending(vec![item("D1", "chef_1", 10.0, 1)]);

        let stranger = order.handle_action(OrderAction::CancelPending { user_id: "cust_2".into(), at: now });
        assert!(matches!(stranger, Err(FrameworkError::Forbidden(_))));

        order
            .handle_action(OrderAction::Respond {
                chef_id: "chef_1".into(),
                decision: ChefDecision::Accept,
                reason: String::new(),
                at: now,
            })
            .unwrap();
        let before = order.clone();
        let late = order.handle_action(OrderAction::CancelPending { user_id: "cust_1".into(), at: now });
        assert_eq!(
            late.unwrap_err(),
            FrameworkError::Validation("Only pending orders can be cancelled".into())
        );
        assert_eq!(order, before);
    }

    #[test]
    fn test_generic_path_can_force_cancel() {
        let now = Utc::now();
        let mut order = pending(vec![item("D1", "chef_1", 10.0, 1)]);
        order
            .handle_action(OrderAction::Advance { chef_id: "chef_1".into(), stage: ChefStage::Ready, at: now })
            .unwrap();

        let outsider = order.handle_action(OrderAction::SetStatus {
            actor_id: "nobody".into(),
            is_registered_chef: false,
            is_admin: false,
            phase: OrderPhase::Cancelled,
            at: now,
        });
        assert!(matches!(outsider, Err(FrameworkError::Forbidden(_))));

        let forced = order
            .handle_action(OrderAction::SetStatus {
                actor_id: "admin_1".into(),
                is_registered_chef: false,
                is_admin: true,
                phase: OrderPhase::Cancelled,
                at: now,
            })
            .unwrap();
        assert_eq!(forced.order.phase, OrderPhase::Cancelled);
        assert_eq!(forced.order.cancelled_by.as_deref(), Some("admin_1"));

        let reopen = order.handle_action(OrderAction::SetStatus {
            actor_id: "admin_1".into(),
            is_registered_chef: false,
            is_admin: true,
            phase: OrderPhase::Pending,
            at: now,
        });
        assert!(matches!(reopen, Err(FrameworkError::Validation(_))));
    }

    #[test]
    fn test_refund_eligibility() {
        let now = Utc::now();
        let mut order = pending(vec![item("D1", "chef_1", 10.0, 1)]);
        let requested = order
            .handle_action(OrderAction::RequestRefund {
                user_id: "cust_1".into(),
                refund_id: "refund_1".into(),
                at: now,
            })
            .unwrap();
        assert!(requested.order.refund_requested);

        order
            .handle_action(OrderAction::Advance { chef_id: "chef_1".into(), stage: ChefStage::Completed, at: now })
            .unwrap();
        let late = order.handle_action(OrderAction::RequestRefund {
            user_id: "cust_1".into(),
            refund_id: "refund_2".into(),
            at: now,
        });
        assert_eq!(late.unwrap_err(), FrameworkError::Validation("Order not eligible for refund".into()));
    }
}
