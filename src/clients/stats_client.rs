use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::instrument;

use crate::clock::Clock;
use crate::domain::{round1, round_money, Chef, Order};
use crate::error::ApiError;
use crate::order_actor::OrderPhase;
use super::{ChefClient, DishClient, OrderClient, ReviewClient, UserClient};

/// Window for the admin dashboard's recent revenue.
const RECENT_REVENUE_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChefStats {
    pub today_orders: usize,
    pub today_earnings: f64,
    pub pending_orders: usize,
    pub preparing_orders: usize,
    pub total_orders: u64,
    pub total_earnings: f64,
    pub dishes_count: usize,
    pub average_rating: f64,
    pub reviews_count: usize,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_chefs: usize,
    pub total_dishes: usize,
    pub total_orders: usize,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
}

/// A chef as listed on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefOverview {
    #[serde(flatten)]
    pub chef: Chef,
    pub dishes_count: usize,
    pub orders_count: usize,
    pub total_revenue: f64,
}

/// Read-only aggregates over several collections, for dashboards.
#[derive(Clone)]
pub struct StatsClient {
    users: UserClient,
    chefs: ChefClient,
    dishes: DishClient,
    orders: OrderClient,
    reviews: ReviewClient,
    clock: Arc<dyn Clock>,
}

fn delivered_total(orders: &[Order], amount: impl Fn(&Order) -> f64) -> f64 {
    round_money(
        orders
            .iter()
            .filter(|order| order.phase == OrderPhase::Delivered)
            .map(amount)
            .sum(),
    )
}

impl StatsClient {
    pub fn new(
        users: UserClient,
        chefs: ChefClient,
        dishes: DishClient,
        orders: OrderClient,
        reviews: ReviewClient,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { users, chefs, dishes, orders, reviews, clock }
    }

    /// Dashboard numbers for one chef. "Today" is the current UTC date.
    #[instrument(skip(self))]
    pub async fn chef_stats(&self, chef_id: String) -> Result<ChefStats, ApiError> {
        let chef = self.chefs.find_chef(chef_id.clone()).await?;
        let today = self.clock.now().date_naive();

        let orders: Vec<Order> = self
            .orders
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| order.chef_id == chef_id)
            .collect();
        let todays: Vec<Order> = orders
            .iter()
            .filter(|order| order.created_at.date_naive() == today)
            .cloned()
            .collect();
        let count_phase = |phase: OrderPhase| orders.iter().filter(|order| order.phase == phase).count();

        let dishes_count = self.dishes.list_for_chef(chef_id.clone()).await?.len();
        let reviews = self.reviews.list_for_chef(chef_id).await?;
        let average_rating = if reviews.is_empty() {
            0.0
        } else {
            let sum: f64 = reviews.iter().map(|review| f64::from(review.rating)).sum();
            round1(sum / reviews.len() as f64)
        };

        Ok(ChefStats {
            today_orders: todays.len(),
            today_earnings: delivered_total(&todays, |order| order.subtotal),
            pending_orders: count_phase(OrderPhase::Pending),
            preparing_orders: count_phase(OrderPhase::Preparing),
            total_orders: chef.total_orders,
            total_earnings: chef.total_earnings,
            dishes_count,
            average_rating,
            reviews_count: reviews.len(),
            is_active: chef.is_active,
        })
    }

    #[instrument(skip(self))]
    pub async fn platform_stats(&self) -> Result<PlatformStats, ApiError> {
        let orders = self.orders.list_orders().await?;
        let since = self.clock.now() - Duration::days(RECENT_REVENUE_DAYS);
        let recent: Vec<Order> = orders.iter().filter(|order| order.created_at > since).cloned().collect();

        Ok(PlatformStats {
            total_users: self.users.list_users().await?.len(),
            total_chefs: self.chefs.list_chefs().await?.len(),
            total_dishes: self.dishes.list_dishes().await?.len(),
            total_orders: orders.len(),
            total_revenue: delivered_total(&orders, |order| order.total),
            monthly_revenue: delivered_total(&recent, |order| order.total),
        })
    }

    /// Every chef with dish count, order count and delivered revenue.
    #[instrument(skip(self))]
    pub async fn chef_overview(&self) -> Result<Vec<ChefOverview>, ApiError> {
        let dishes = self.dishes.list_dishes().await?;
        let orders = self.orders.list_orders().await?;
        let mut chefs = self.chefs.list_chefs().await?;
        chefs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(chefs
            .into_iter()
            .map(|chef| {
                let own: Vec<Order> = orders.iter().filter(|order| order.chef_id == chef.id).cloned().collect();
                ChefOverview {
                    dishes_count: dishes.iter().filter(|dish| dish.cooker_id == chef.id).count(),
                    orders_count: own.len(),
                    total_revenue: delivered_total(&own, |order| order.total),
                    chef,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::chef_cache::ActiveChefCache;
    use crate::clients::{NewReview, PlaceOrder};
    use crate::clock::ManualClock;
    use crate::domain::{ChefRegistration, Dish, DishCreate, OrderItem, Review, User};
    use crate::notifications::testing::RecordingTransport;
    use crate::notifications::NotificationDispatcher;
    use crate::order_actor::ChefStage;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn counter(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
        let next = Arc::new(AtomicU64::new(1));
        move || format!("{}_{}", prefix, next.fetch_add(1, Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_dashboards() {
        let manual = Arc::new(ManualClock::new());
        let clock: Arc<dyn Clock> = manual.clone();
        let (a, user_inner) = ResourceActor::<User>::new(16, counter("user"));
        tokio::spawn(a.run());
        let (a, chef_inner) = ResourceActor::<Chef>::new(16, counter("chef"));
        tokio::spawn(a.run());
        let (a, dish_inner) = ResourceActor::<Dish>::new(16, counter("dish"));
        tokio::spawn(a.run());
        let (a, order_inner) = ResourceActor::<Order>::new(16, counter("order"));
        tokio::spawn(a.run());
        let (a, review_inner) = ResourceActor::<Review>::new(16, counter("review"));
        tokio::spawn(a.run());

        let users = UserClient::new(user_inner, clock.clone());
        let chefs = ChefClient::new(chef_inner, users.clone(), clock.clone());
        let cache = Arc::new(ActiveChefCache::new(chefs.clone(), clock.clone(), std::time::Duration::from_secs(300)));
        let dishes = DishClient::new(dish_inner, chefs.clone(), cache, clock.clone());
        let notifier = NotificationDispatcher::new(users.clone(), chefs.clone(), Arc::new(RecordingTransport::default()));
        let orders = OrderClient::new(order_inner, users.clone(), chefs.clone(), dishes.clone(), notifier.clone(), clock.clone(), 3.0);
        let reviews = ReviewClient::new(review_inner, dishes.clone(), users.clone(), notifier, clock.clone());
        let stats = StatsClient::new(users.clone(), chefs.clone(), dishes.clone(), orders.clone(), reviews.clone(), clock);

        chefs.register("chef_1".into(), ChefRegistration::default()).await.unwrap();
        let params: DishCreate = serde_json::from_value(serde_json::json!({"name": "Ojja", "price": 10.0})).unwrap();
        let dish = dishes.create("chef_1".into(), params).await.unwrap();

        let checkout = || PlaceOrder {
            items: vec![OrderItem {
                dish_id: dish.id.clone(),
                dish_name: "Ojja".into(),
                dish_image: String::new(),
                price: 10.0,
                quantity: 1,
                cooker_id: "chef_1".into(),
                cooker_name: String::new(),
            }],
            delivery_address: "1 Rue".into(),
            ..Default::default()
        };
        let done = orders.place_order("cust_1".into(), String::new(), checkout()).await.unwrap();
        orders.advance(done.id, "chef_1".into(), ChefStage::Completed).await.unwrap();
        orders.place_order("cust_1".into(), String::new(), checkout()).await.unwrap();

        for (user, rating) in [("u1", 5), ("u2", 4)] {
            let review = NewReview {
                dish_id: dish.id.clone(),
                user_id: user.into(),
                order_id: None,
                rating,
                comment: String::new(),
            };
            reviews.create(review).await.unwrap();
        }

        let chef_stats = stats.chef_stats("chef_1".into()).await.unwrap();
        assert_eq!(chef_stats.today_orders, 2);
        assert_eq!(chef_stats.today_earnings, 10.0);
        assert_eq!(chef_stats.pending_orders, 1);
        assert_eq!(chef_stats.total_earnings, 10.0);
        assert_eq!(chef_stats.dishes_count, 1);
        assert_eq!(chef_stats.average_rating, 4.5);
        assert_eq!(chef_stats.reviews_count, 2);

        let platform = stats.platform_stats().await.unwrap();
        assert_eq!(platform.total_chefs, 1);
        assert_eq!(platform.total_orders, 2);
        assert_eq!(platform.total_revenue, 13.0);
        assert_eq!(platform.monthly_revenue, 13.0);

        manual.advance(std::time::Duration::from_secs(31 * 24 * 3600));
        let later = stats.platform_stats().await.unwrap();
        assert_eq!(later.monthly_revenue, 0.0);
        assert_eq!(stats.chef_stats("chef_1".into()).await.unwrap().today_orders, 0);

        let overview = stats.chef_overview().await.unwrap();
        assert_eq!(overview[0].orders_count, 2);
        assert_eq!(overview[0].total_revenue, 13.0);
    }
}
