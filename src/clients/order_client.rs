use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clock::Clock;
use crate::domain::{Order, OrderCreate, OrderItem};
use crate::notifications::NotificationDispatcher;
use crate::order_actor::{ChefDecision, ChefStage, OrderAction, OrderError, OrderPhase, OrderTransition};
use super::{ChefClient, DishClient, Page, UserClient};

/// Most orders returned to a customer at once.
pub const CUSTOMER_ORDER_LIMIT: usize = 50;

/// Checkout body posted by a customer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceOrder {
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
    pub delivery_notes: String,
    pub payment_method: String,
}

/// Drives orders through their lifecycle.
///
/// The phase change is the only atomic step. Crediting the chef, counting dish
/// sales and notifying happen afterwards, each at most once; a failure in any of
/// them is logged and never undoes the transition.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    users: UserClient,
    chefs: ChefClient,
    dishes: DishClient,
    notifier: NotificationDispatcher,
    clock: Arc<dyn Clock>,
    delivery_fee: f64,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        users: UserClient,
        chefs: ChefClient,
        dishes: DishClient,
        notifier: NotificationDispatcher,
        clock: Arc<dyn Clock>,
        delivery_fee: f64,
    ) -> Self {
        Self { inner, users, chefs, dishes, notifier, clock, delivery_fee }
    }

    /// Creates a pending order and tells the chef.
    #[instrument(skip(self, user_email, request))]
    pub async fn place_order(&self, user_id: String, user_email: String, request: PlaceOrder) -> Result<Order, OrderError> {
        let params = OrderCreate {
            user_id,
            user_email,
            items: request.items,
            delivery_address: request.delivery_address,
            delivery_notes: request.delivery_notes,
            payment_method: request.payment_method,
            delivery_fee: self.delivery_fee,
            created_at: self.clock.now(),
        };
        let order = self.inner.create(params).await?;
        info!(order_id = %order.id, total = order.total, "Order placed");

        self.notifier.order_changed(&order).await;
        Ok(order)
    }

    #[instrument(skip(self, reason))]
    pub async fn respond(
        &self,
        order_id: String,
        chef_id: String,
        decision: ChefDecision,
        reason: String,
    ) -> Result<Order, OrderError> {
        let at = self.clock.now();
        let action = OrderAction::Respond { chef_id, decision, reason, at };
        let transition = self.inner.perform_action(order_id, action).await?;
        self.announce(&transition).await;
        Ok(transition.order)
    }

    /// Moves an order along its preparation stages; completion credits the chef.
    #[instrument(skip(self))]
    pub async fn advance(&self, order_id: String, chef_id: String, stage: ChefStage) -> Result<Order, OrderError> {
        let at = self.clock.now();
        let action = OrderAction::Advance { chef_id: chef_id.clone(), stage, at };
        let transition = self.inner.perform_action(order_id, action).await?;

        if stage == ChefStage::Completed {
            self.settle_completed(&chef_id, &transition.order).await;
        }
        self.announce(&transition).await;
        Ok(transition.order)
    }

    /// Customer cancellation, only while pending.
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: String, user_id: String) -> Result<Order, OrderError> {
        let at = self.clock.now();
        let transition = self
            .inner
            .perform_action(order_id, OrderAction::CancelPending { user_id, at })
            .await?;
        self.announce(&transition).await;
        Ok(transition.order)
    }

    /// Generic status write. Unlike `cancel`, this may cancel an order past pending.
    #[instrument(skip(self))]
    pub async fn set_status(&self, order_id: String, actor_id: String, phase: OrderPhase) -> Result<Order, OrderError> {
        let is_registered_chef = self.chefs.is_registered(actor_id.clone()).await?;
        let is_admin = self.users.is_admin(actor_id.clone()).await?;
        let at = self.clock.now();
        let action = OrderAction::SetStatus { actor_id, is_registered_chef, is_admin, phase, at };
        let transition = self.inner.perform_action(order_id, action).await?;
        self.announce(&transition).await;
        Ok(transition.order)
    }

    async fn announce(&self, transition: &OrderTransition) {
        if transition.is_announced() {
            self.notifier.order_changed(&transition.order).await;
        }
    }

    async fn settle_completed(&self, chef_id: &str, order: &Order) {
        match self.chefs.record_completed_order(chef_id.to_string(), order.subtotal).await {
            Ok(chef) => info!(chef_id, total_earnings = chef.total_earnings, "Chef credited"),
            Err(e) => warn!(chef_id, order_id = %order.id, error = %e, "Could not credit chef"),
        }
        for item in &order.items {
            let quantity = u64::from(item.quantity);
            if let Err(e) = self.dishes.add_orders(item.dish_id.clone(), quantity).await {
                warn!(dish_id = %item.dish_id, error = %e, "Could not count dish sale");
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn order_for_customer(&self, order_id: String, user_id: String) -> Result<Order, OrderError> {
        let order = self.find_order(order_id).await?;
        if !order.is_customer(&user_id) {
            return Err(OrderError::Forbidden("Unauthorized".into()));
        }
        Ok(order)
    }

    async fn newest_first(&self, filter: impl Fn(&Order) -> bool + Send + Sync + 'static) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.inner.list(filter).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn list_for_customer(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.newest_first(move |order| order.is_customer(&user_id)).await?;
        orders.truncate(CUSTOMER_ORDER_LIMIT);
        Ok(orders)
    }

    /// Orders naming `chef_id` on any line, optionally narrowed to one `chefStatus`.
    #[instrument(skip(self))]
    pub async fn list_for_chef(
        &self,
        chef_id: String,
        chef_status: Option<String>,
        page: usize,
        per_page: usize,
    ) -> Result<Page<Order>, OrderError> {
        let orders = self
            .newest_first(move |order| {
                order.is_assigned_chef(&chef_id)
                    && chef_status.as_deref().is_none_or(|s| order.phase.chef_status() == s)
            })
            .await?;
        Ok(Page::of(orders, page, per_page))
    }

    /// Admin listing; `status` matches either wire field.
    #[instrument(skip(self))]
    pub async fn list_all(&self, status: Option<String>, limit: usize) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .newest_first(move |order| status.as_deref().is_none_or(|s| order.phase.matches(s)))
            .await?;
        orders.truncate(limit);
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.newest_first(|_| true).await
    }

    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        order_id: String,
        method: String,
        payment_id: Option<String>,
        payment_status: String,
    ) -> Result<Order, OrderError> {
        let at = self.clock.now();
        let action = OrderAction::RecordPayment { method, payment_id, payment_status, at };
        Ok(self.inner.perform_action(order_id, action).await?.order)
    }

    #[instrument(skip(self))]
    pub async fn request_refund(&self, order_id: String, user_id: String, refund_id: String) -> Result<Order, OrderError> {
        let at = self.clock.now();
        let action = OrderAction::RequestRefund { user_id, refund_id, at };
        Ok(self.inner.perform_action(order_id, action).await?.order)
    }
}
