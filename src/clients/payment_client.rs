use std::sync::Arc;

use tracing::{info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clock::Clock;
use crate::domain::{settlement_status, Order, Payment, PaymentCreate, Refund, RefundCreate, CASH};
use crate::notifications::NotificationDispatcher;
use crate::payment_actor::PaymentError;
use super::OrderClient;

/// Placeholder payment flow: records confirmations and refund requests
/// without talking to a payment gateway.
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<Payment>,
    refunds: ResourceClient<Refund>,
    orders: OrderClient,
    notifier: NotificationDispatcher,
    clock: Arc<dyn Clock>,
}

impl_client_methods!(PaymentClient, Payment, PaymentError, payment);

impl PaymentClient {
    pub fn new(
        inner: ResourceClient<Payment>,
        refunds: ResourceClient<Refund>,
        orders: OrderClient,
        notifier: NotificationDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { inner, refunds, orders, notifier, clock }
    }

    /// Records a payment against an order. Card payments are settled at once
    /// and announced to the chef; cash stays pending.
    #[instrument(skip(self))]
    pub async fn confirm(
        &self,
        user_id: String,
        order_id: String,
        method: String,
        payment_id: Option<String>,
    ) -> Result<(Order, Payment), PaymentError> {
        if order_id.is_empty() || method.is_empty() {
            return Err(PaymentError::ValidationError("orderId and paymentMethod are required".into()));
        }
        let (order_status, _) = settlement_status(&method);
        let order = self
            .orders
            .record_payment(order_id, method.clone(), payment_id.clone(), order_status.to_string())
            .await?;

        let payment = self
            .inner
            .create(PaymentCreate {
                order_id: order.id.clone(),
                user_id,
                amount: order.total,
                payment_method: method.clone(),
                payment_id,
                created_at: self.clock.now(),
            })
            .await?;
        info!(payment_id = %payment.id, order_id = %order.id, status = %payment.status, "Payment recorded");

        if method != CASH {
            self.notifier.payment_confirmed(&order).await;
        }
        Ok((order, payment))
    }

    /// The user's payments, newest first.
    #[instrument(skip(self))]
    pub async fn history(&self, user_id: String) -> Result<Vec<Payment>, PaymentError> {
        let mut payments = self.inner.list(move |payment: &Payment| payment.user_id == user_id).await?;
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(payments)
    }

    /// Files a pending refund for the order's customer and flags the order.
    #[instrument(skip(self, reason))]
    pub async fn request_refund(&self, user_id: String, order_id: String, reason: String) -> Result<Refund, PaymentError> {
        if order_id.is_empty() {
            return Err(PaymentError::ValidationError("orderId is required".into()));
        }
        let order = self.orders.find_order(order_id).await?;
        if !order.is_customer(&user_id) {
            return Err(PaymentError::Forbidden("Unauthorized".into()));
        }
        if order.phase.is_terminal() {
            return Err(PaymentError::ValidationError("Order not eligible for refund".into()));
        }

        let refund = self
            .refunds
            .create(RefundCreate {
                order_id: order.id.clone(),
                user_id: user_id.clone(),
                amount: order.total,
                reason,
                created_at: self.clock.now(),
            })
            .await?;
        self.orders.request_refund(order.id, user_id, refund.id.clone()).await?;
        info!(refund_id = %refund.id, "Refund requested");
        Ok(refund)
    }
}
