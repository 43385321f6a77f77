use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clock::Clock;
use crate::domain::{Review, ReviewCreate, ReviewPatch, ReportAction};
use crate::notifications::NotificationDispatcher;
use crate::review_actor::{summarize, RatingSummary, ReviewAction, ReviewError};
use super::{DishClient, Page, UserClient};

/// Shown when a reviewer has no name on file.
pub const ANONYMOUS_REVIEWER: &str = "مستخدم";

/// A validated review submission.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub dish_id: String,
    pub user_id: String,
    pub order_id: Option<String>,
    pub rating: u8,
    pub comment: String,
}

/// Client for reviews. Every write that can move a dish's rating recomputes
/// the dish aggregate from the full review set.
#[derive(Clone)]
pub struct ReviewClient {
    inner: ResourceClient<Review>,
    dishes: DishClient,
    users: UserClient,
    notifier: NotificationDispatcher,
    clock: Arc<dyn Clock>,
}

impl_client_methods!(ReviewClient, Review, ReviewError, review);

impl ReviewClient {
    pub fn new(
        inner: ResourceClient<Review>,
        dishes: DishClient,
        users: UserClient,
        notifier: NotificationDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { inner, dishes, users, notifier, clock }
    }

    #[instrument(skip(self, review), fields(dish_id = %review.dish_id, user_id = %review.user_id))]
    pub async fn create(&self, review: NewReview) -> Result<(Review, RatingSummary), ReviewError> {
        let dish = self.dishes.find_dish(review.dish_id.clone()).await?;
        let author = self.users.get_user(review.user_id.clone()).await?;
        let (user_name, user_image) = match author {
            Some(user) => (
                user.display_name().unwrap_or(ANONYMOUS_REVIEWER).to_string(),
                user.profile_image,
            ),
            None => (ANONYMOUS_REVIEWER.to_string(), String::new()),
        };

        let params = ReviewCreate {
            dish_id: review.dish_id,
            cooker_id: dish.cooker_id.clone(),
            order_id: review.order_id,
            user_id: review.user_id,
            user_name,
            user_image,
            rating: review.rating,
            comment: review.comment,
            created_at: self.clock.now(),
        };
        let created = self.inner.create(params).await?;
        info!(review_id = %created.id, rating = created.rating, "Review created");

        let summary = self.recompute(&created.dish_id, f64::from(created.rating)).await?;
        self.notifier.review_posted(&created, &dish).await;
        Ok((created, summary))
    }

    /// Author or admin may edit. The aggregate is recomputed only when the rating moves.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, review_id: String, actor_id: String, mut patch: ReviewPatch) -> Result<Review, ReviewError> {
        let existing = self.find_review(review_id.clone()).await?;
        if existing.user_id != actor_id && !self.users.is_admin(actor_id).await? {
            return Err(ReviewError::Forbidden("Unauthorized - not your review".into()));
        }
        patch.updated_at = Some(self.clock.now());
        let updated = self.inner.update(review_id, patch).await?;
        if updated.rating != existing.rating {
            self.recompute(&updated.dish_id, 0.0).await?;
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, review_id: String, actor_id: String) -> Result<RatingSummary, ReviewError> {
        let existing = self.find_review(review_id.clone()).await?;
        if existing.user_id != actor_id && !self.users.is_admin(actor_id).await? {
            return Err(ReviewError::Forbidden("Unauthorized".into()));
        }
        self.remove(review_id).await
    }

    async fn remove(&self, review_id: String) -> Result<RatingSummary, ReviewError> {
        let removed = self.inner.delete(review_id).await?;
        info!(review_id = %removed.id, "Review deleted");
        self.recompute(&removed.dish_id, 0.0).await
    }

    #[instrument(skip(self, reason))]
    pub async fn report(&self, review_id: String, reported_by: String, reason: String) -> Result<Review, ReviewError> {
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(review_id, ReviewAction::Report { reported_by, reason, at })
            .await?)
    }

    /// Closes a report. `Remove` deletes the review and returns `None`.
    #[instrument(skip(self))]
    pub async fn resolve_report(
        &self,
        review_id: String,
        resolved_by: String,
        action: ReportAction,
    ) -> Result<Option<Review>, ReviewError> {
        match action {
            ReportAction::Remove => {
                self.remove(review_id).await?;
                Ok(None)
            }
            ReportAction::Dismiss => {
                let at = self.clock.now();
                let resolved = self
                    .inner
                    .perform_action(review_id, ReviewAction::Resolve { action, resolved_by, at })
                    .await?;
                Ok(Some(resolved))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_for_dish(&self, dish_id: String, page: usize, per_page: usize) -> Result<Page<Review>, ReviewError> {
        let mut reviews = self.inner.list(move |review: &Review| review.dish_id == dish_id).await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::of(reviews, page, per_page))
    }

    /// Open reports, newest report first.
    #[instrument(skip(self))]
    pub async fn list_reported(&self) -> Result<Vec<Review>, ReviewError> {
        let mut reviews = self
            .inner
            .list(|review: &Review| review.is_reported && !review.report_resolved)
            .await?;
        reviews.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(reviews)
    }

    #[instrument(skip(self))]
    pub async fn list_for_chef(&self, chef_id: String) -> Result<Vec<Review>, ReviewError> {
        Ok(self.inner.list(move |review: &Review| review.cooker_id == chef_id).await?)
    }

    /// Rewrites the dish's rating from every review it has. A deleted dish
    /// keeps its reviews; the summary is still returned.
    async fn recompute(&self, dish_id: &str, fallback: f64) -> Result<RatingSummary, ReviewError> {
        let wanted = dish_id.to_string();
        let ratings: Vec<u8> = self
            .inner
            .list(move |review: &Review| review.dish_id == wanted)
            .await?
            .iter()
            .map(|review| review.rating)
            .collect();
        let summary = summarize(&ratings, fallback);

        match self.dishes.set_rating(dish_id.to_string(), summary).await {
            Ok(_) => info!(dish_id, rating = summary.rating, review_count = summary.review_count, "Dish rating updated"),
            Err(e) => warn!(dish_id, error = %e, "Could not update dish rating"),
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::chef_cache::ActiveChefCache;
    use crate::clients::ChefClient;
    use crate::clock::ManualClock;
    use crate::domain::{Chef, ChefRegistration, Dish, DishCreate, User};
    use crate::notifications::testing::RecordingTransport;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct Fixture {
        clock: Arc<ManualClock>,
        users: UserClient,
        dishes: DishClient,
        reviews: ReviewClient,
        transport: Arc<RecordingTransport>,
        dish_id: String,
    }

    async fn start() -> Fixture {
        let manual = Arc::new(ManualClock::new());
        let clock: Arc<dyn Clock> = manual.clone();
        let (user_actor, user_inner) = ResourceActor::<User>::new(16, || "unused".to_string());
        tokio::spawn(user_actor.run());
        let (chef_actor, chef_inner) = ResourceActor::<Chef>::new(16, || "unused".to_string());
        tokio::spawn(chef_actor.run());
        let (dish_actor, dish_inner) = ResourceActor::<Dish>::new(16, || "dish_1".to_string());
        tokio::spawn(dish_actor.run());
        let next = Arc::new(AtomicU64::new(1));
        let (review_actor, review_inner) =
            ResourceActor::<Review>::new(16, move || format!("review_{}", next.fetch_add(1, Ordering::SeqCst)));
        tokio::spawn(review_actor.run());

        let users = UserClient::new(user_inner, clock.clone());
        let chefs = ChefClient::new(chef_inner, users.clone(), clock.clone());
        let cache = Arc::new(ActiveChefCache::new(chefs.clone(), clock.clone(), Duration::from_secs(300)));
        let dishes = DishClient::new(dish_inner, chefs.clone(), cache, clock.clone());
        let transport = Arc::new(RecordingTransport::default());
        let notifier = NotificationDispatcher::new(users.clone(), chefs.clone(), transport.clone());
        let reviews = ReviewClient::new(review_inner, dishes.clone(), users.clone(), notifier, clock);

        chefs.register("chef_1".into(), ChefRegistration::default()).await.unwrap();
        users.register_push_token("chef_1".into(), "tok_chef".into()).await.unwrap();
        let params: DishCreate = serde_json::from_value(serde_json::json!({"name": "Ojja", "price": 9.0})).unwrap();
        let dish = dishes.create("chef_1".into(), params).await.unwrap();

        Fixture { clock: manual, users, dishes, reviews, transport, dish_id: dish.id }
    }

    fn submission(dish_id: &str, user_id: &str, rating: u8) -> NewReview {
        NewReview {
            dish_id: dish_id.into(),
            user_id: user_id.into(),
            order_id: None,
            rating,
            comment: String::new(),
        }
    }

    async fn dish_rating(f: &Fixture) -> (f64, u64) {
        let dish = f.dishes.find_dish(f.dish_id.clone()).await.unwrap();
        (dish.rating, dish.review_count)
    }

    #[tokio::test]
    async fn test_review_lifecycle_recomputes_aggregate() {
        let f = start().await;
        let (five, _) = f.reviews.create(submission(&f.dish_id, "u1", 5)).await.unwrap();
        assert_eq!(dish_rating(&f).await, (5.0, 1));

        f.clock.advance(Duration::from_secs(1));
        f.reviews.create(submission(&f.dish_id, "u2", 3)).await.unwrap();
        assert_eq!(dish_rating(&f).await, (4.0, 2));

        f.reviews.delete(five.id, "u1".into()).await.unwrap();
        assert_eq!(dish_rating(&f).await, (3.0, 1));
    }

    #[tokio::test]
    async fn test_only_author_or_admin_mutates() {
        let f = start().await;
        let (review, _) = f.reviews.create(submission(&f.dish_id, "u1", 4)).await.unwrap();
        f.users.ensure_user("u2".into(), String::new(), String::new()).await.unwrap();

        let patch = ReviewPatch { rating: Some(1), ..Default::default() };
        assert_eq!(
            f.reviews.update(review.id.clone(), "u2".into(), patch.clone()).await,
            Err(ReviewError::Forbidden("Unauthorized - not your review".into()))
        );
        assert_eq!(dish_rating(&f).await, (4.0, 1));

        let updated = f.reviews.update(review.id.clone(), "u1".into(), patch).await.unwrap();
        assert_eq!(updated.rating, 1);
        assert_eq!(dish_rating(&f).await, (1.0, 1));

        assert_eq!(
            f.reviews.delete(review.id, "u2".into()).await,
            Err(ReviewError::Forbidden("Unauthorized".into()))
        );
    }

    #[tokio::test]
    async fn test_unknown_dish_and_bad_rating() {
        let f = start().await;
        assert_eq!(
            f.reviews.create(submission("ghost", "u1", 4)).await,
            Err(ReviewError::NotFound("Dish not found".into()))
        );
        assert_eq!(
            f.reviews.create(submission(&f.dish_id, "u1", 6)).await,
            Err(ReviewError::ValidationError("Rating must be between 1 and 5".into()))
        );
    }

    #[tokio::test]
    async fn test_chef_hears_about_new_review() {
        let f = start().await;
        let (review, _) = f.reviews.create(submission(&f.dish_id, "u1", 5)).await.unwrap();
        assert_eq!(review.user_name, ANONYMOUS_REVIEWER);
        let sent = f.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "tok_chef");
        assert_eq!(sent[0].1.body, "تقييم رائع ⭐⭐⭐⭐⭐ على Ojja");
    }

    #[tokio::test]
    async fn test_report_then_remove() {
        let f = start().await;
        let (review, _) = f.reviews.create(submission(&f.dish_id, "u1", 2)).await.unwrap();
        f.reviews.report(review.id.clone(), "u9".into(), "spam".into()).await.unwrap();
        assert_eq!(f.reviews.list_reported().await.unwrap().len(), 1);

        let outcome = f
            .reviews
            .resolve_report(review.id, "admin".into(), ReportAction::Remove)
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(f.reviews.list_reported().await.unwrap().is_empty());
        assert_eq!(dish_rating(&f).await, (0.0, 0));
    }
}
