use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::clients::{ChefClient, UserClient};
use crate::domain::{Dish, Order, Review};
use super::events::{Notice, OrderEvent};
use super::transport::PushTransport;

/// Turns business events into push notifications.
///
/// Delivery never fails the caller: every problem (no recipient, no token,
/// category switched off, transport error) is logged and reported as `false`.
#[derive(Clone)]
pub struct NotificationDispatcher {
    users: UserClient,
    chefs: ChefClient,
    transport: Arc<dyn PushTransport>,
}

impl NotificationDispatcher {
    pub fn new(users: UserClient, chefs: ChefClient, transport: Arc<dyn PushTransport>) -> Self {
        Self { users, chefs, transport }
    }

    /// Announces the phase `order` has just entered.
    #[instrument(skip(self, order), fields(order_id = %order.id, status = %order.phase))]
    pub async fn order_changed(&self, order: &Order) -> bool {
        let Some(event) = OrderEvent::for_order(order) else {
            debug!("Phase has no notification");
            return false;
        };
        let counterpart = match event {
            OrderEvent::Placed => self.customer_name(&order.user_id).await,
            OrderEvent::Accepted => self.chef_name(&order.chef_id).await,
            _ => None,
        };
        let notice = Notice::Order { event, order_id: order.id.clone(), counterpart };
        self.deliver(event.recipient(order), notice).await
    }

    /// Tells the dish's chef about a new review.
    #[instrument(skip(self, review, dish), fields(review_id = %review.id, dish_id = %dish.id))]
    pub async fn review_posted(&self, review: &Review, dish: &Dish) -> bool {
        let notice = Notice::NewReview {
            review_id: review.id.clone(),
            dish_id: dish.id.clone(),
            dish_name: dish.name.clone(),
            rating: review.rating,
        };
        self.deliver(&dish.cooker_id, notice).await
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn payment_confirmed(&self, order: &Order) -> bool {
        let notice = Notice::PaymentConfirmed { order_id: order.id.clone(), amount: order.total };
        self.deliver(&order.chef_id, notice).await
    }

    #[instrument(skip(self, title, body))]
    pub async fn send_test(&self, user_id: &str, title: String, body: String) -> bool {
        self.deliver(user_id, Notice::Test { title, body }).await
    }

    async fn deliver(&self, recipient_id: &str, notice: Notice) -> bool {
        if recipient_id.is_empty() {
            debug!("No recipient for notification");
            return false;
        }

        let user = match self.users.get_user(recipient_id.to_string()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(recipient_id, "Recipient has no user document");
                return false;
            }
            Err(e) => {
                warn!(recipient_id, error = %e, "Could not load notification recipient");
                return false;
            }
        };

        if let Some(category) = notice.category() {
            if !category.enabled_in(&user.notification_settings) {
                debug!(recipient_id, ?category, "Notification suppressed by preference");
                return false;
            }
        }

        let Some(token) = user.fcm_token.as_deref().filter(|t| !t.is_empty()) else {
            debug!(recipient_id, "Recipient has no push token");
            return false;
        };

        let message = notice.render();
        match self.transport.send(token, &message).await {
            Ok(message_id) => {
                info!(recipient_id, %message_id, "Notification delivered");
                true
            }
            Err(e) => {
                warn!(recipient_id, error = %e, "Notification delivery failed");
                false
            }
        }
    }

    async fn customer_name(&self, user_id: &str) -> Option<String> {
        match self.users.get_user(user_id.to_string()).await {
            Ok(Some(user)) => user.display_name().map(str::to_string),
            _ => None,
        }
    }

    async fn chef_name(&self, chef_id: &str) -> Option<String> {
        match self.chefs.get_chef(chef_id.to_string()).await {
            Ok(Some(chef)) if !chef.name.trim().is_empty() => Some(chef.name),
            _ => None,
        }
    }
}
