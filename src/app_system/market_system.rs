use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::auth::IdentityVerifier;
use crate::chef_cache::ActiveChefCache;
use crate::clients::{
    CartClient, ChefClient, ConversationClient, DishClient, OrderClient, PaymentClient, ReviewClient,
    StatsClient, UserClient,
};
use crate::clock::Clock;
use crate::config::Config;
use crate::domain::{Cart, Chef, Conversation, Dish, Order, Payment, Refund, Review, User};
use crate::http::{self, AppState};
use crate::notifications::{NotificationDispatcher, PushTransport};

const MAILBOX_SIZE: usize = 32;

/// Id generator producing `<prefix>_1`, `<prefix>_2`, ...
fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// Every collection actor plus the clients wired on top of them.
///
/// Actors stop once the last client handle is dropped, so [`MarketSystem::shutdown`]
/// drops the state and then waits for them.
pub struct MarketSystem {
    pub state: AppState,
    handles: Vec<JoinHandle<()>>,
}

impl MarketSystem {
    pub fn start(
        config: &Config,
        transport: Arc<dyn PushTransport>,
        identity: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut handles = Vec::new();

        let (user_actor, user_inner) = ResourceActor::<User>::new(MAILBOX_SIZE, sequential_ids("user"));
        handles.push(tokio::spawn(user_actor.run()));
        let (chef_actor, chef_inner) = ResourceActor::<Chef>::new(MAILBOX_SIZE, sequential_ids("chef"));
        handles.push(tokio::spawn(chef_actor.run()));
        let (dish_actor, dish_inner) = ResourceActor::<Dish>::new(MAILBOX_SIZE, sequential_ids("dish"));
        handles.push(tokio::spawn(dish_actor.run()));
        let (cart_actor, cart_inner) = ResourceActor::<Cart>::new(MAILBOX_SIZE, sequential_ids("cart"));
        handles.push(tokio::spawn(cart_actor.run()));
        let (order_actor, order_inner) = ResourceActor::<Order>::new(MAILBOX_SIZE, sequential_ids("order"));
        handles.push(tokio::spawn(order_actor.run()));
        let (review_actor, review_inner) = ResourceActor::<Review>::new(MAILBOX_SIZE, sequential_ids("review"));
        handles.push(tokio::spawn(review_actor.run()));
        let (conversation_actor, conversation_inner) =
            ResourceActor::<Conversation>::new(MAILBOX_SIZE, sequential_ids("conversation"));
        handles.push(tokio::spawn(conversation_actor.run()));
        let (payment_actor, payment_inner) = ResourceActor::<Payment>::new(MAILBOX_SIZE, sequential_ids("payment"));
        handles.push(tokio::spawn(payment_actor.run()));
        let (refund_actor, refund_inner) = ResourceActor::<Refund>::new(MAILBOX_SIZE, sequential_ids("refund"));
        handles.push(tokio::spawn(refund_actor.run()));

        let users = UserClient::new(user_inner, clock.clone());
        let chefs = ChefClient::new(chef_inner, users.clone(), clock.clone());
        let active_chefs = Arc::new(ActiveChefCache::new(chefs.clone(), clock.clone(), config.chef_cache_ttl));
        let dishes = DishClient::new(dish_inner, chefs.clone(), active_chefs, clock.clone());
        let notifier = NotificationDispatcher::new(users.clone(), chefs.clone(), transport);
        let carts = CartClient::new(cart_inner, dishes.clone(), chefs.clone(), clock.clone());
        let orders = OrderClient::new(
            order_inner,
            users.clone(),
            chefs.clone(),
            dishes.clone(),
            notifier.clone(),
            clock.clone(),
            config.delivery_fee,
        );
        let reviews = ReviewClient::new(review_inner, dishes.clone(), users.clone(), notifier.clone(), clock.clone());
        let conversations = ConversationClient::new(conversation_inner, users.clone(), clock.clone());
        let payments = PaymentClient::new(payment_inner, refund_inner, orders.clone(), notifier.clone(), clock.clone());
        let stats = StatsClient::new(
            users.clone(),
            chefs.clone(),
            dishes.clone(),
            orders.clone(),
            reviews.clone(),
            clock.clone(),
        );

        info!(actors = handles.len(), "Marketplace actors started");

        Self {
            state: AppState {
                users,
                chefs,
                dishes,
                carts,
                orders,
                reviews,
                conversations,
                payments,
                stats,
                notifier,
                identity,
                clock,
            },
            handles,
        }
    }

    /// Grants admin access to each configured account, creating it if needed.
    pub async fn seed_admins(&self, uids: &[String]) -> Result<(), String> {
        for uid in uids {
            self.state
                .users
                .grant_admin(uid.clone())
                .await
                .map_err(|e| format!("Failed to seed admin {}: {}", uid, e))?;
        }
        Ok(())
    }

    pub fn router(&self) -> Router {
        http::router(self.state.clone())
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.state);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
