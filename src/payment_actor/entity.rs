use std::convert::Infallible;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{settlement_status, Payment, PaymentCreate, Refund, RefundCreate, CURRENCY};

/// Payment records are append-only.
impl Entity for Payment {
    type Id = String;
    type CreateParams = PaymentCreate;
    type UpdateParams = Infallible;
    type Action = Infallible;
    type ActionResult = ();

    const COLLECTION: &'static str = "payments";

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: PaymentCreate) -> Result<Self, FrameworkError> {
        if params.payment_method.trim().is_empty() {
            return Err(FrameworkError::Validation("paymentMethod is required".into()));
        }
        let (_, record_status) = settlement_status(&params.payment_method);
        Ok(Self {
            id,
            order_id: params.order_id,
            user_id: params.user_id,
            amount: params.amount,
            currency: CURRENCY.to_string(),
            payment_method: params.payment_method,
            payment_id: params.payment_id,
            status: record_status.to_string(),
            created_at: params.created_at,
        })
    }

    fn on_update(&mut self, params: Infallible) -> Result<(), FrameworkError> {
        match params {}
    }

    fn handle_action(&mut self, action: Infallible) -> Result<(), FrameworkError> {
        match action {}
    }
}

/// Refund requests start pending; approval happens outside this service.
impl Entity for Refund {
    type Id = String;
    type CreateParams = RefundCreate;
    type UpdateParams = Infallible;
    type Action = Infallible;
    type ActionResult = ();

    const COLLECTION: &'static str = "refunds";

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: RefundCreate) -> Result<Self, FrameworkError> {
        Ok(Self {
            id,
            order_id: params.order_id,
            user_id: params.user_id,
            amount: params.amount,
            reason: params.reason,
            status: "pending".to_string(),
            created_at: params.created_at,
        })
    }

    fn on_update(&mut self, params: Infallible) -> Result<(), FrameworkError> {
        match params {}
    }

    fn handle_action(&mut self, action: Infallible) -> Result<(), FrameworkError> {
        match action {}
    }
}
