use std::sync::Arc;

use tracing::{info, instrument};

use crate::actor_framework::ResourceClient;
use crate::chef_cache::ActiveChefCache;
use crate::clock::Clock;
use crate::dish_actor::{DishAction, DishError};
use crate::domain::{Chef, Dish, DishCreate, DishListing, DishPatch};
use crate::review_actor::RatingSummary;
use super::{ChefClient, Page};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Filters for the public dish catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub cooker_id: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: String,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: usize,
}

/// Client for the dishes collection.
#[derive(Clone)]
pub struct DishClient {
    inner: ResourceClient<Dish>,
    chefs: ChefClient,
    active_chefs: Arc<ActiveChefCache>,
    clock: Arc<dyn Clock>,
}

impl_client_methods!(DishClient, Dish, DishError, dish);

fn listing(dish: Dish, chef: &Chef, with_status: bool) -> DishListing {
    let mut dish = dish;
    if !chef.name.is_empty() {
        dish.cooker_name = chef.name.clone();
    }
    DishListing {
        dish,
        cooker_image: chef.profile_image.clone(),
        cooker_rating: chef.rating,
        cooker_is_active: with_status.then_some(chef.is_active),
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl DishClient {
    pub fn new(
        inner: ResourceClient<Dish>,
        chefs: ChefClient,
        active_chefs: Arc<ActiveChefCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { inner, chefs, active_chefs, clock }
    }

    /// Adds a dish to `user_id`'s menu. Only registered chefs may sell.
    #[instrument(skip(self, params))]
    pub async fn create(&self, user_id: String, mut params: DishCreate) -> Result<Dish, DishError> {
        let chef = self
            .chefs
            .get_chef(user_id.clone())
            .await?
            .ok_or_else(|| DishError::Forbidden("You must be a registered chef".into()))?;
        params.cooker_id = user_id;
        params.cooker_name = chef.name;
        params.created_at = Some(self.clock.now());

        let dish = self.inner.create(params).await?;
        info!(dish_id = %dish.id, cooker_id = %dish.cooker_id, "Dish created");
        Ok(dish)
    }

    async fn find_owned(&self, dish_id: String, user_id: &str) -> Result<Dish, DishError> {
        let dish = self.find_dish(dish_id).await?;
        if dish.cooker_id != user_id {
            return Err(DishError::Forbidden("Unauthorized".into()));
        }
        Ok(dish)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, dish_id: String, user_id: String, mut patch: DishPatch) -> Result<Dish, DishError> {
        self.find_owned(dish_id.clone(), &user_id).await?;
        patch.updated_at = Some(self.clock.now());
        Ok(self.inner.update(dish_id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, dish_id: String, user_id: String) -> Result<Dish, DishError> {
        self.find_owned(dish_id.clone(), &user_id).await?;
        let dish = self.inner.delete(dish_id).await?;
        info!(dish_id = %dish.id, "Dish deleted");
        Ok(dish)
    }

    #[instrument(skip(self))]
    pub async fn set_availability(&self, dish_id: String, user_id: String, available: bool) -> Result<Dish, DishError> {
        self.find_owned(dish_id.clone(), &user_id).await?;
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(dish_id, DishAction::SetAvailability { available, at })
            .await?)
    }

    /// One dish with its chef's current public details.
    #[instrument(skip(self))]
    pub async fn detail(&self, dish_id: String) -> Result<DishListing, DishError> {
        let dish = self.find_dish(dish_id).await?;
        match self.chefs.get_chef(dish.cooker_id.clone()).await? {
            Some(chef) => Ok(listing(dish, &chef, true)),
            None => Ok(DishListing {
                dish,
                cooker_image: String::new(),
                cooker_rating: 0.0,
                cooker_is_active: None,
            }),
        }
    }

    /// Available dishes of currently active chefs, as seen through the chef cache.
    async fn listed(&self, filter: impl Fn(&Dish) -> bool + Send + Sync + 'static) -> Result<Vec<DishListing>, DishError> {
        let active = self.active_chefs.active_chefs().await?;
        let dishes = self.inner.list(move |dish: &Dish| dish.is_available && filter(dish)).await?;
        Ok(dishes
            .into_iter()
            .filter_map(|dish| {
                let chef = active.get(&dish.cooker_id)?;
                Some(listing(dish, chef, false))
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn catalog(&self, query: CatalogQuery) -> Result<Page<DishListing>, DishError> {
        let CatalogQuery { category, cooker_id, search, page, per_page } = query;
        let search = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let per_page = if per_page == 0 { DEFAULT_PAGE_SIZE } else { per_page };

        let mut dishes = self
            .listed(move |dish| {
                category.as_ref().is_none_or(|c| &dish.category == c)
                    && cooker_id.as_ref().is_none_or(|id| &dish.cooker_id == id)
                    && search.as_ref().is_none_or(|needle| {
                        contains_folded(&dish.name, needle) || contains_folded(&dish.description, needle)
                    })
            })
            .await?;
        dishes.sort_by(|a, b| b.dish.created_at.cmp(&a.dish.created_at));
        Ok(Page::of(dishes, page, per_page))
    }

    #[instrument(skip(self))]
    pub async fn popular(&self, limit: usize) -> Result<Vec<DishListing>, DishError> {
        let mut dishes = self.listed(|_| true).await?;
        dishes.sort_by(|a, b| b.dish.orders_count.cmp(&a.dish.orders_count));
        dishes.truncate(limit);
        Ok(dishes)
    }

    /// Name matches rank first, then rating. An empty query with no category finds nothing.
    #[instrument(skip(self))]
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<DishListing>, DishError> {
        let SearchQuery { q, category, min_price, max_price, limit } = query;
        let needle = q.trim().to_lowercase();
        let category = category.filter(|c| !c.is_empty());
        if needle.is_empty() && category.is_none() {
            return Ok(Vec::new());
        }

        let text = needle.clone();
        let mut dishes = self
            .listed(move |dish| {
                let text_match = text.is_empty()
                    || contains_folded(&dish.name, &text)
                    || contains_folded(&dish.description, &text)
                    || dish.ingredients.iter().any(|i| contains_folded(i, &text));
                text_match
                    && category.as_ref().is_none_or(|c| &dish.category == c)
                    && min_price.is_none_or(|min| dish.price >= min)
                    && max_price.is_none_or(|max| dish.price <= max)
            })
            .await?;

        let name_match = |listing: &DishListing| !needle.is_empty() && contains_folded(&listing.dish.name, &needle);
        dishes.sort_by(|a, b| {
            name_match(b)
                .cmp(&name_match(a))
                .then(b.dish.rating.total_cmp(&a.dish.rating))
        });
        dishes.truncate(limit);
        Ok(dishes)
    }

    /// Every dish a chef owns, available or not, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_chef(&self, chef_id: String) -> Result<Vec<Dish>, DishError> {
        let mut dishes = self.inner.list(move |dish: &Dish| dish.cooker_id == chef_id).await?;
        dishes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(dishes)
    }

    #[instrument(skip(self))]
    pub async fn list_dishes(&self) -> Result<Vec<Dish>, DishError> {
        Ok(self.inner.list(|_: &Dish| true).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_rating(&self, dish_id: String, summary: RatingSummary) -> Result<Dish, DishError> {
        let action = DishAction::SetRating {
            rating: summary.rating,
            review_count: summary.review_count,
        };
        Ok(self.inner.perform_action(dish_id, action).await?)
    }

    #[instrument(skip(self))]
    pub async fn add_orders(&self, dish_id: String, quantity: u64) -> Result<Dish, DishError> {
        Ok(self.inner.perform_action(dish_id, DishAction::AddOrders { quantity }).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::clients::UserClient;
    use crate::clock::ManualClock;
    use crate::domain::{ChefRegistration, User};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct Fixture {
        clock: Arc<ManualClock>,
        chefs: ChefClient,
        dishes: DishClient,
    }

    async fn start() -> Fixture {
        let manual = Arc::new(ManualClock::new());
        let clock: Arc<dyn Clock> = manual.clone();
        let (user_actor, user_inner) = ResourceActor::<User>::new(16, || "unused".to_string());
        tokio::spawn(user_actor.run());
        let (chef_actor, chef_inner) = ResourceActor::<Chef>::new(16, || "unused".to_string());
        tokio::spawn(chef_actor.run());
        let counter = Arc::new(AtomicU64::new(1));
        let (dish_actor, dish_inner) = ResourceActor::<Dish>::new(16, move || {
            format!("dish_{}", counter.fetch_add(1, Ordering::SeqCst))
        });
        tokio::spawn(dish_actor.run());

        let users = UserClient::new(user_inner, clock.clone());
        let chefs = ChefClient::new(chef_inner, users, clock.clone());
        let cache = Arc::new(ActiveChefCache::new(chefs.clone(), clock.clone(), Duration::from_secs(300)));
        let dishes = DishClient::new(dish_inner, chefs.clone(), cache, clock);

        for (id, name) in [("c1", "Mabrouka"), ("c2", "Hedi")] {
            let registration = ChefRegistration { name: name.into(), ..Default::default() };
            chefs.register(id.into(), registration).await.unwrap();
        }
        Fixture { clock: manual, chefs, dishes }
    }

    fn new_dish(name: &str, price: f64, category: &str) -> DishCreate {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "price": price,
            "category": category,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_only_registered_chefs_create() {
        let f = start().await;
        let err = f.dishes.create("stranger".into(), new_dish("Brik", 4.0, "traditional")).await;
        assert_eq!(err, Err(DishError::Forbidden("You must be a registered chef".into())));

        let dish = f.dishes.create("c1".into(), new_dish("Brik", 4.0, "traditional")).await.unwrap();
        assert_eq!(dish.cooker_name, "Mabrouka");
        assert_eq!(dish.preparation_time, 30);
    }

    #[tokio::test]
    async fn test_owner_checks() {
        let f = start().await;
        let dish = f.dishes.create("c1".into(), new_dish("Brik", 4.0, "traditional")).await.unwrap();

        let patch = DishPatch { price: Some(5.0), ..Default::default() };
        let err = f.dishes.update(dish.id.clone(), "c2".into(), patch.clone()).await;
        assert_eq!(err, Err(DishError::Forbidden("Unauthorized".into())));
        assert!(f.dishes.delete(dish.id.clone(), "c2".into()).await.is_err());

        let updated = f.dishes.update(dish.id.clone(), "c1".into(), patch).await.unwrap();
        assert_eq!(updated.price, 5.0);
        assert_eq!(
            f.dishes.delete("dish_404".into(), "c1".into()).await,
            Err(DishError::NotFound("Dish not found".into()))
        );
    }

    #[tokio::test]
    async fn test_catalog_hides_offline_chefs_after_ttl() {
        let f = start().await;
        f.dishes.create("c1".into(), new_dish("Couscous", 18.5, "couscous")).await.unwrap();
        f.dishes.create("c2".into(), new_dish("Ojja", 9.0, "traditional")).await.unwrap();

        let page = f.dishes.catalog(CatalogQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);

        f.chefs.set_availability("c1".into(), false).await.unwrap();
        let stale = f.dishes.catalog(CatalogQuery::default()).await.unwrap();
        assert_eq!(stale.total, 2);

        f.clock.advance(Duration::from_secs(301));
        let fresh = f.dishes.catalog(CatalogQuery::default()).await.unwrap();
        assert_eq!(fresh.total, 1);
        assert_eq!(fresh.items[0].dish.name, "Ojja");
    }

    #[tokio::test]
    async fn test_unavailable_dishes_leave_the_catalog() {
        let f = start().await;
        let dish = f.dishes.create("c1".into(), new_dish("Couscous", 18.5, "couscous")).await.unwrap();
        f.dishes.set_availability(dish.id.clone(), "c1".into(), false).await.unwrap();

        assert_eq!(f.dishes.catalog(CatalogQuery::default()).await.unwrap().total, 0);
        let detail = f.dishes.detail(dish.id).await.unwrap();
        assert_eq!(detail.cooker_is_active, Some(true));
    }

    #[tokio::test]
    async fn test_search_ranks_name_matches_first() {
        let f = start().await;
        let mut by_ingredient = new_dish("Salade mechouia", 6.0, "salads");
        by_ingredient.ingredients = vec!["Tuna".into()];
        let salad = f.dishes.create("c1".into(), by_ingredient).await.unwrap();
        f.dishes
            .set_rating(salad.id, RatingSummary { rating: 5.0, review_count: 1 })
            .await
            .unwrap();
        f.dishes.create("c2".into(), new_dish("Tuna brik", 4.0, "traditional")).await.unwrap();

        let query = SearchQuery { q: "tuna".into(), limit: 20, ..Default::default() };
        let found = f.dishes.search(query).await.unwrap();
        let names: Vec<_> = found.iter().map(|l| l.dish.name.as_str()).collect();
        assert_eq!(names, vec!["Tuna brik", "Salade mechouia"]);

        assert!(f.dishes.search(SearchQuery { limit: 20, ..Default::default() }).await.unwrap().is_empty());
    }
}
