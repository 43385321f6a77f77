//! What each notification says and which preference gates it.

use std::collections::BTreeMap;

use crate::domain::{NotificationSettings, Order};
use crate::order_actor::OrderPhase;
use super::transport::PushMessage;

const FALLBACK_CUSTOMER_NAME: &str = "عميل";
const FALLBACK_CHEF_NAME: &str = "الطاهي";
pub const DEFAULT_TEST_TITLE: &str = "Test Notification";
pub const DEFAULT_TEST_BODY: &str = "This is a test notification from Diari";

/// Preference categories a user can switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    OrderUpdates,
    NewMessages,
    Promotions,
    Reviews,
}

impl Category {
    pub fn enabled_in(self, settings: &NotificationSettings) -> bool {
        match self {
            Category::OrderUpdates => settings.order_updates,
            Category::NewMessages => settings.new_messages,
            Category::Promotions => settings.promotions,
            Category::Reviews => settings.reviews,
        }
    }
}

/// Order lifecycle moments that produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Placed,
    Accepted,
    Ready,
    OnTheWay,
    Delivered,
    CancelledByCustomer,
    CancelledForCustomer,
}

impl OrderEvent {
    /// Event announced when an order enters its current phase.
    /// `Preparing` is silent.
    pub fn for_order(order: &Order) -> Option<Self> {
        match order.phase {
            OrderPhase::Pending => Some(OrderEvent::Placed),
            OrderPhase::Accepted => Some(OrderEvent::Accepted),
            OrderPhase::Preparing => None,
            OrderPhase::Ready => Some(OrderEvent::Ready),
            OrderPhase::OutForDelivery => Some(OrderEvent::OnTheWay),
            OrderPhase::Delivered => Some(OrderEvent::Delivered),
            OrderPhase::Rejected | OrderPhase::Cancelled => {
                if order.cancelled_by.as_deref() == Some(order.user_id.as_str()) {
                    Some(OrderEvent::CancelledByCustomer)
                } else {
                    Some(OrderEvent::CancelledForCustomer)
                }
            }
        }
    }

    /// Chef-bound events go to the order's chef, the rest to the customer.
    pub fn recipient(self, order: &Order) -> &str {
        match self {
            OrderEvent::Placed | OrderEvent::CancelledByCustomer => &order.chef_id,
            _ => &order.user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Order {
        event: OrderEvent,
        order_id: String,
        /// Customer name for `Placed`, chef name for `Accepted`.
        counterpart: Option<String>,
    },
    NewReview {
        review_id: String,
        dish_id: String,
        dish_name: String,
        rating: u8,
    },
    PaymentConfirmed {
        order_id: String,
        amount: f64,
    },
    Test {
        title: String,
        body: String,
    },
}

impl Notice {
    /// Preference that can suppress this notice; test pushes are never gated.
    pub fn category(&self) -> Option<Category> {
        match self {
            Notice::Order { .. } | Notice::PaymentConfirmed { .. } => Some(Category::OrderUpdates),
            Notice::NewReview { .. } => Some(Category::Reviews),
            Notice::Test { .. } => None,
        }
    }

    pub fn render(&self) -> PushMessage {
        match self {
            Notice::Order { event, order_id, counterpart } => render_order(*event, order_id, counterpart.as_deref()),
            Notice::NewReview { review_id, dish_id, dish_name, rating } => {
                let body = if *rating >= 4 {
                    format!("تقييم رائع {} على {}", "⭐".repeat(usize::from(*rating)), dish_name)
                } else {
                    format!("تقييم جديد على {}", dish_name)
                };
                message(
                    "تقييم جديد",
                    body,
                    [
                        ("type", "new_review"),
                        ("reviewId", review_id.as_str()),
                        ("dishId", dish_id.as_str()),
                        ("screen", "DishDetails"),
                    ],
                )
            }
            Notice::PaymentConfirmed { order_id, amount } => message(
                "تم استلام الدفعة 💰",
                format!("تم تأكيد الدفع بمبلغ {} ريال", format_amount(*amount)),
                [("type", "payment_confirmed"), ("orderId", order_id.as_str()), ("screen", "OrderDetails")],
            ),
            Notice::Test { title, body } => message(title, body.clone(), [("type", "test")]),
        }
    }
}

fn render_order(event: OrderEvent, order_id: &str, counterpart: Option<&str>) -> PushMessage {
    let (title, body, kind, screen) = match event {
        OrderEvent::Placed => (
            "طلب جديد 🎉",
            format!("لديك طلب جديد من {}", counterpart.unwrap_or(FALLBACK_CUSTOMER_NAME)),
            "new_order",
            "OrderDetails",
        ),
        OrderEvent::Accepted => (
            "تم قبول الطلب ✅",
            format!("{} قبل طلبك وبدأ في التحضير", counterpart.unwrap_or(FALLBACK_CHEF_NAME)),
            "order_accepted",
            "OrderDetails",
        ),
        OrderEvent::Ready => (
            "طلبك جاهز! 🍽️",
            "طلبك جاهز للاستلام أو التوصيل".to_string(),
            "order_ready",
            "OrderDetails",
        ),
        OrderEvent::OnTheWay => (
            "الطلب في الطريق 🚗",
            "طلبك في الطريق إليك".to_string(),
            "order_delivery",
            "OrderTracking",
        ),
        OrderEvent::Delivered => (
            "تم التوصيل! 🎉",
            "تم توصيل طلبك بنجاح. نتمنى أن تستمتع بوجبتك!".to_string(),
            "order_delivered",
            "OrderDetails",
        ),
        OrderEvent::CancelledByCustomer => (
            "تم إلغاء الطلب",
            format!("ألغى العميل الطلب #{}", order_id.chars().take(8).collect::<String>()),
            "order_cancelled",
            "OrderDetails",
        ),
        OrderEvent::CancelledForCustomer => (
            "تم إلغاء الطلب ❌",
            "عذراً، ألغى الطاهي طلبك. سيتم إرجاع المبلغ".to_string(),
            "order_cancelled",
            "OrderDetails",
        ),
    };
    message(title, body, [("type", kind), ("orderId", order_id), ("screen", screen)])
}

fn message<const N: usize>(title: &str, body: String, data: [(&str, &str); N]) -> PushMessage {
    PushMessage {
        title: title.to_string(),
        body,
        data: data
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// `40.0` stays `40.0`, `12.25` stays `12.25`.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.1}", amount)
    } else {
        format!("{}", amount)
    }
}
