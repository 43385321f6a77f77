use crate::domain::Order;

/// Capacity in which a caller acts on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRole {
    Customer,
    /// Chef of the order or of any of its line items.
    AssignedChef,
    Admin,
    /// Any account with a chef profile, assigned or not.
    RegisteredChef,
    None,
}

/// Resolves the caller's role once per request.
///
/// Precedence: customer, assigned chef, admin, registered chef.
pub fn authorize(order: &Order, actor_id: &str, is_registered_chef: bool, is_admin: bool) -> OrderRole {
    if order.is_customer(actor_id) {
        OrderRole::Customer
    } else if order.is_assigned_chef(actor_id) {
        OrderRole::AssignedChef
    } else if is_admin {
        OrderRole::Admin
    } else if is_registered_chef {
        OrderRole::RegisteredChef
    } else {
        OrderRole::None
    }
}

impl OrderRole {
    /// Who may use the generic status path.
    pub fn may_set_status(self) -> bool {
        !matches!(self, OrderRole::None)
    }
}
