use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::cart_actor::CartError;
use crate::clock::Clock;
use crate::domain::{Cart, CartItem};
use super::{ChefClient, DishClient};

/// Body of an add-to-cart request. Anything but the dish id and quantity may
/// be omitted and is then copied from the dish.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub dish_id: Option<String>,
    pub quantity: Option<i64>,
    pub dish_name: Option<String>,
    pub dish_image: Option<String>,
    pub price: Option<f64>,
    pub cooker_id: Option<String>,
    pub cooker_name: Option<String>,
}

fn positive_quantity(quantity: i64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| CartError::ValidationError("quantity must be greater than 0".into()))
}

/// Client for the carts collection. Every change rewrites the whole cart.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    dishes: DishClient,
    chefs: ChefClient,
    clock: Arc<dyn Clock>,
}

impl_client_methods!(CartClient, Cart, CartError, cart);

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>, dishes: DishClient, chefs: ChefClient, clock: Arc<dyn Clock>) -> Self {
        Self { inner, dishes, chefs, clock }
    }

    /// The user's cart, or an empty one if they never added anything.
    #[instrument(skip(self))]
    pub async fn cart_for(&self, user_id: String) -> Result<Cart, CartError> {
        let now = self.clock.now();
        Ok(self.get_cart(user_id.clone()).await?.unwrap_or_else(|| Cart::new(user_id, now)))
    }

    #[instrument(skip(self, request))]
    pub async fn add_item(&self, user_id: String, request: AddToCart) -> Result<Cart, CartError> {
        let (Some(dish_id), Some(quantity)) = (request.dish_id.clone(), request.quantity) else {
            return Err(CartError::ValidationError("dishId and quantity are required".into()));
        };
        let quantity = positive_quantity(quantity)?;
        let item = self.snapshot(dish_id, quantity, request).await?;

        let mut cart = self.cart_for(user_id).await?;
        cart.add(item, self.clock.now()).map_err(CartError::ValidationError)?;
        self.inner.put(cart.clone()).await?;
        debug!(items = cart.item_count(), total = cart.total, "Cart written");
        Ok(cart)
    }

    /// Builds the line item, filling gaps from the dish and its chef.
    async fn snapshot(&self, dish_id: String, quantity: u32, request: AddToCart) -> Result<CartItem, CartError> {
        let AddToCart { dish_name, dish_image, price, cooker_id, cooker_name, .. } = request;
        let now = self.clock.now();

        let (Some(dish_name), Some(price)) = (dish_name.clone(), price) else {
            let dish = self.dishes.find_dish(dish_id.clone()).await?;
            let cooker_id = cooker_id.unwrap_or(dish.cooker_id);
            let cooker_name = match cooker_name {
                Some(name) => name,
                None if cooker_id.is_empty() => String::new(),
                None => self
                    .chefs
                    .get_chef(cooker_id.clone())
                    .await?
                    .map(|chef| chef.name)
                    .unwrap_or_default(),
            };
            return Ok(CartItem {
                dish_id,
                dish_name: dish_name.unwrap_or(dish.name),
                dish_image: dish_image.unwrap_or(dish.image),
                price: price.unwrap_or(dish.price),
                quantity,
                cooker_id,
                cooker_name,
                added_at: now,
            });
        };

        Ok(CartItem {
            dish_id,
            dish_name,
            dish_image: dish_image.unwrap_or_default(),
            price,
            quantity,
            cooker_id: cooker_id.unwrap_or_default(),
            cooker_name: cooker_name.unwrap_or_default(),
            added_at: now,
        })
    }

    /// Sets a line's quantity; zero or less removes it.
    #[instrument(skip(self))]
    pub async fn update_item(&self, user_id: String, dish_id: String, quantity: i64) -> Result<Cart, CartError> {
        let mut cart = self
            .get_cart(user_id)
            .await?
            .ok_or_else(|| CartError::NotFound("Cart not found".into()))?;
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if !cart.set_quantity(&dish_id, quantity, self.clock.now()) {
            return Err(CartError::NotFound("Item not in cart".into()));
        }
        self.inner.put(cart.clone()).await?;
        Ok(cart)
    }

    /// Removing a dish that is not in the cart is not an error.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: String, dish_id: String) -> Result<Cart, CartError> {
        let mut cart = self
            .get_cart(user_id)
            .await?
            .ok_or_else(|| CartError::NotFound("Cart not found".into()))?;
        cart.remove(&dish_id, self.clock.now());
        self.inner.put(cart.clone()).await?;
        Ok(cart)
    }

    /// Deletes the cart document.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: String) -> Result<(), CartError> {
        match self.inner.delete(user_id).await {
            Ok(_) | Err(FrameworkError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::chef_cache::ActiveChefCache;
    use crate::clients::UserClient;
    use crate::clock::SystemClock;
    use crate::domain::{Chef, ChefRegistration, Dish, DishCreate, DishPatch, User};
    use std::time::Duration;

    struct Fixture {
        dishes: DishClient,
        carts: CartClient,
        dish_id: String,
    }

    async fn start() -> Fixture {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let (user_actor, user_inner) = ResourceActor::<User>::new(16, || "unused".to_string());
        tokio::spawn(user_actor.run());
        let (chef_actor, chef_inner) = ResourceActor::<Chef>::new(16, || "unused".to_string());
        tokio::spawn(chef_actor.run());
        let (dish_actor, dish_inner) = ResourceActor::<Dish>::new(16, || "D1".to_string());
        tokio::spawn(dish_actor.run());
        let (cart_actor, cart_inner) = ResourceActor::<Cart>::new(16, || "unused".to_string());
        tokio::spawn(cart_actor.run());

        let users = UserClient::new(user_inner, clock.clone());
        let chefs = ChefClient::new(chef_inner, users, clock.clone());
        let cache = Arc::new(ActiveChefCache::new(chefs.clone(), clock.clone(), Duration::from_secs(300)));
        let dishes = DishClient::new(dish_inner, chefs.clone(), cache, clock.clone());
        let carts = CartClient::new(cart_inner, dishes.clone(), chefs.clone(), clock);

        let registration = ChefRegistration { name: "Mabrouka".into(), ..Default::default() };
        chefs.register("chef_1".into(), registration).await.unwrap();
        let params: DishCreate = serde_json::from_value(serde_json::json!({
            "name": "Couscous", "price": 18.5, "image": "c.jpg"
        }))
        .unwrap();
        let dish = dishes.create("chef_1".into(), params).await.unwrap();
        Fixture { dishes, carts, dish_id: dish.id }
    }

    fn add(dish_id: &str, quantity: i64) -> AddToCart {
        AddToCart {
            dish_id: Some(dish_id.into()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_cart_reads_as_empty() {
        let f = start().await;
        let cart = f.carts.cart_for("u1".into()).await.unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0.0);
    }

    #[tokio::test]
    async fn test_add_snapshots_dish_and_merges() {
        let f = start().await;
        let cart = f.carts.add_item("u1".into(), add(&f.dish_id, 2)).await.unwrap();
        assert_eq!(cart.items[0].dish_name, "Couscous");
        assert_eq!(cart.items[0].cooker_name, "Mabrouka");
        assert_eq!(cart.total, 37.0);

        let patch = DishPatch { price: Some(99.0), ..Default::default() };
        f.dishes.update(f.dish_id.clone(), "chef_1".into(), patch).await.unwrap();

        let cart = f.carts.add_item("u1".into(), add(&f.dish_id, 1)).await.unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total, 55.5);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let f = start().await;
        assert_eq!(
            f.carts.add_item("u1".into(), add(&f.dish_id, 0)).await,
            Err(CartError::ValidationError("quantity must be greater than 0".into()))
        );
        assert_eq!(
            f.carts.add_item("u1".into(), add("ghost", 1)).await,
            Err(CartError::NotFound("Dish not found".into()))
        );
        assert!(f.carts.add_item("u1".into(), AddToCart::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_add_keeps_cart_when_quantity_overflows() {
        let f = start().await;
        f.carts.add_item("u1".into(), add(&f.dish_id, 3_000_000_000)).await.unwrap();

        assert_eq!(
            f.carts.add_item("u1".into(), add(&f.dish_id, 3_000_000_000)).await,
            Err(CartError::ValidationError("quantity is too large".into()))
        );
        let cart = f.carts.cart_for("u1".into()).await.unwrap();
        assert_eq!(cart.items[0].quantity, 3_000_000_000);
        assert_eq!(cart.total, 18.5 * 3_000_000_000.0);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let f = start().await;
        assert_eq!(
            f.carts.update_item("u1".into(), f.dish_id.clone(), 2).await,
            Err(CartError::NotFound("Cart not found".into()))
        );

        f.carts.add_item("u1".into(), add(&f.dish_id, 2)).await.unwrap();
        assert_eq!(
            f.carts.update_item("u1".into(), "other".into(), 2).await,
            Err(CartError::NotFound("Item not in cart".into()))
        );
        let cart = f.carts.update_item("u1".into(), f.dish_id.clone(), 5).await.unwrap();
        assert_eq!(cart.total, 92.5);

        let cart = f.carts.update_item("u1".into(), f.dish_id.clone(), -1).await.unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0.0);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let f = start().await;
        f.carts.add_item("u1".into(), add(&f.dish_id, 1)).await.unwrap();
        f.carts.clear("u1".into()).await.unwrap();
        f.carts.clear("u1".into()).await.unwrap();
        assert!(f.carts.get_cart("u1".into()).await.unwrap().is_none());
    }
}
