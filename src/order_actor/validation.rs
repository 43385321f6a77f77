use crate::domain::{round_money, OrderCreate, OrderItem};

/// Checks a checkout request before anything is written.
pub fn validate_new_order(params: &OrderCreate) -> Result<(), String> {
    if params.items.is_empty() {
        return Err("Order must have at least one item".into());
    }
    if params.delivery_address.trim().is_empty() {
        return Err("Delivery address is required".into());
    }
    for item in &params.items {
        if item.dish_id.trim().is_empty() {
            return Err("Every item needs a dishId".into());
        }
        if item.quantity == 0 {
            return Err("Item quantity must be at least 1".into());
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err("Item price must not be negative".into());
        }
    }
    if !params.delivery_fee.is_finite() || params.delivery_fee < 0.0 {
        return Err("Delivery fee must not be negative".into());
    }
    Ok(())
}

pub fn subtotal(items: &[OrderItem]) -> f64 {
    round_money(items.iter().map(OrderItem::line_total).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(items: Vec<OrderItem>, address: &str) -> OrderCreate {
        OrderCreate {
            user_id: "cust_1".into(),
            user_email: String::new(),
            items,
            delivery_address: address.into(),
            delivery_notes: String::new(),
            payment_method: "cash".into(),
            delivery_fee: 3.0,
            created_at: Utc::now(),
        }
    }

    fn item(price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            dish_id: "D1".into(),
            dish_name: "Couscous".into(),
            dish_image: String::new(),
            price,
            quantity,
            cooker_id: "chef_1".into(),
            cooker_name: String::new(),
        }
    }

    #[test]
    fn test_rejects_incomplete_checkout() {
        assert_eq!(
            validate_new_order(&request(vec![], "123 St")),
            Err("Order must have at least one item".into())
        );
        assert_eq!(
            validate_new_order(&request(vec![item(5.0, 1)], "   ")),
            Err("Delivery address is required".into())
        );
        assert!(validate_new_order(&request(vec![item(5.0, 0)], "123 St")).is_err());
        assert!(validate_new_order(&request(vec![item(-1.0, 1)], "123 St")).is_err());
        assert!(validate_new_order(&request(vec![item(5.0, 2)], "123 St")).is_ok());
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(subtotal(&[item(18.5, 2)]), 37.0);
        assert_eq!(subtotal(&[item(0.1, 3), item(0.2, 1)]), 0.5);
    }
}
