use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's pending basket. Keyed by the user id; `total` is always derived from `items`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(skip)]
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub updated_at: DateTime<Utc>,
}

/// Point-in-time snapshot of a dish, taken when it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub dish_id: String,
    pub dish_name: String,
    pub dish_image: String,
    pub price: f64,
    pub quantity: u32,
    pub cooker_id: String,
    pub cooker_name: String,
    pub added_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
            total: 0.0,
            updated_at: now,
        }
    }

    /// Merges into an existing line for the same dish, otherwise appends.
    /// A merged quantity that no longer fits leaves the cart untouched.
    pub fn add(&mut self, item: CartItem, now: DateTime<Utc>) -> Result<(), String> {
        match self.items.iter_mut().find(|line| line.dish_id == item.dish_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| "quantity is too large".to_string())?;
            }
            None => self.items.push(item),
        }
        self.touch(now);
        Ok(())
    }

    /// Replaces a line's quantity; zero removes the line.
    /// Returns false when the dish is not in the cart.
    pub fn set_quantity(&mut self, dish_id: &str, quantity: u32, now: DateTime<Utc>) -> bool {
        let Some(index) = self.items.iter().position(|line| line.dish_id == dish_id) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = quantity;
        }
        self.touch(now);
        true
    }

    pub fn remove(&mut self, dish_id: &str, now: DateTime<Utc>) {
        self.items.retain(|line| line.dish_id != dish_id);
        self.touch(now);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.total = self
            .items
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum();
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(dish_id: &str, price: f64, quantity: u32) -> CartItem {
        CartItem {
            dish_id: dish_id.to_string(),
            dish_name: format!("Dish {}", dish_id),
            dish_image: String::new(),
            price,
            quantity,
            cooker_id: "chef_1".to_string(),
            cooker_name: "Amira".to_string(),
            added_at: Utc::now(),
        }
    }

    fn expected_total(cart: &Cart) -> f64 {
        cart.items.iter().map(|l| l.price * l.quantity as f64).sum()
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let now = Utc::now();
        let mut cart = Cart::new("user_1", now);

        cart.add(line("d1", 18.5, 2), now).unwrap();
        assert_eq!(cart.total, 37.0);

        cart.add(line("d2", 4.25, 1), now).unwrap();
        cart.add(line("d1", 18.5, 1), now).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total, expected_total(&cart));

        assert!(cart.set_quantity("d2", 4, now));
        assert_eq!(cart.total, expected_total(&cart));

        assert!(cart.set_quantity("d1", 0, now));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total, 17.0);

        cart.remove("d2", now);
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0.0);
    }

    #[test]
    fn test_set_quantity_on_missing_line() {
        let now = Utc::now();
        let mut cart = Cart::new("user_1", now);
        cart.add(line("d1", 10.0, 1), now).unwrap();

        assert!(!cart.set_quantity("d9", 2, now));
        assert_eq!(cart.total, 10.0);
    }

    #[test]
    fn test_merge_overflow_is_rejected() {
        let now = Utc::now();
        let mut cart = Cart::new("user_1", now);
        cart.add(line("d1", 2.0, 3_000_000_000), now).unwrap();

        assert_eq!(cart.add(line("d1", 2.0, 3_000_000_000), now), Err("quantity is too large".to_string()));
        assert_eq!(cart.items[0].quantity, 3_000_000_000);
        assert_eq!(cart.total, expected_total(&cart));
    }
}
