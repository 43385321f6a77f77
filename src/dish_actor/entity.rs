use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{
    Dish, DishCreate, DishPatch, DEFAULT_CATEGORY, DEFAULT_PREPARATION_MINUTES, DEFAULT_SERVING_SIZE,
};
use super::actions::DishAction;

fn check_price(price: f64) -> Result<f64, FrameworkError> {
    if !price.is_finite() || price < 0.0 {
        return Err(FrameworkError::Validation("price must not be negative".into()));
    }
    Ok(price)
}

impl Entity for Dish {
    type Id = String;
    type CreateParams = DishCreate;
    type UpdateParams = DishPatch;
    type Action = DishAction;
    type ActionResult = Dish;

    const COLLECTION: &'static str = "dishes";

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Dish owned by `params.cooker_id`.
    ///
    /// # Errors
    /// `name` and `price` are required; price must not be negative.
    fn from_create_params(id: String, params: DishCreate) -> Result<Self, FrameworkError> {
        if params.name.trim().is_empty() {
            return Err(FrameworkError::Validation("name is required".into()));
        }
        let price = params
            .price
            .ok_or_else(|| FrameworkError::Validation("price is required".into()))
            .and_then(check_price)?;
        let created_at = params.created_at.unwrap_or_else(chrono::Utc::now);

        Ok(Self {
            id,
            cooker_id: params.cooker_id,
            cooker_name: params.cooker_name,
            name: params.name,
            description: params.description,
            price,
            category: params.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image: params.image,
            images: params.images,
            ingredients: params.ingredients,
            preparation_time: params.preparation_time.unwrap_or(DEFAULT_PREPARATION_MINUTES),
            serving_size: params.serving_size.unwrap_or_else(|| DEFAULT_SERVING_SIZE.to_string()),
            is_available: true,
            is_spicy: params.is_spicy,
            is_vegetarian: params.is_vegetarian,
            rating: 0.0,
            review_count: 0,
            orders_count: 0,
            created_at,
            updated_at: created_at,
        })
    }

    /// Applies a chef's partial edit. Rating, counters and ownership are not editable.
    fn on_update(&mut self, patch: DishPatch) -> Result<(), FrameworkError> {
        if let Some(price) = patch.price {
            self.price = check_price(price)?;
        }
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(FrameworkError::Validation("name is required".into()));
            }
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(preparation_time) = patch.preparation_time {
            self.preparation_time = preparation_time;
        }
        if let Some(serving_size) = patch.serving_size {
            self.serving_size = serving_size;
        }
        if let Some(is_spicy) = patch.is_spicy {
            self.is_spicy = is_spicy;
        }
        if let Some(is_vegetarian) = patch.is_vegetarian {
            self.is_vegetarian = is_vegetarian;
        }
        if let Some(at) = patch.updated_at {
            self.updated_at = at;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: DishAction) -> Result<Dish, FrameworkError> {
        match action {
            DishAction::SetAvailability { available, at } => {
                self.is_available = available;
                self.updated_at = at;
            }
            DishAction::SetRating { rating, review_count } => {
                self.rating = rating;
                self.review_count = review_count;
            }
            DishAction::AddOrders { quantity } => {
                self.orders_count += quantity;
            }
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, price: Option<f64>) -> DishCreate {
        DishCreate {
            cooker_id: "chef_1".into(),
            cooker_name: "Amira".into(),
            name: name.into(),
            description: String::new(),
            price,
            category: None,
            image: String::new(),
            images: vec![],
            ingredients: vec![],
            preparation_time: None,
            serving_size: None,
            is_spicy: false,
            is_vegetarian: false,
            created_at: None,
        }
    }

    #[test]
    fn test_create_applies_defaults() {
        let dish = Dish::from_create_params("dish_1".into(), create("Couscous", Some(18.5))).unwrap();
        assert_eq!(dish.category, "عام");
        assert_eq!(dish.serving_size, "1 شخص");
        assert_eq!(dish.preparation_time, 30);
        assert!(dish.is_available);
        assert_eq!(dish.review_count, 0);
    }

    #[test]
    fn test_create_requires_name_and_price() {
        assert_eq!(
            Dish::from_create_params("d".into(), create(" ", Some(1.0))),
            Err(FrameworkError::Validation("name is required".into()))
        );
        assert_eq!(
            Dish::from_create_params("d".into(), create("Brik", None)),
            Err(FrameworkError::Validation("price is required".into()))
        );
        assert!(Dish::from_create_params("d".into(), create("Brik", Some(-2.0))).is_err());
    }

    #[test]
    fn test_rejected_update_changes_nothing() {
        let mut dish = Dish::from_create_params("d".into(), create("Brik", Some(4.0))).unwrap();
        let patch = DishPatch {
            price: Some(-1.0),
            name: Some("Renamed".into()),
            ..Default::default()
        };
        assert!(dish.on_update(patch).is_err());
        assert_eq!(dish.name, "Brik");
        assert_eq!(dish.price, 4.0);
    }
}
