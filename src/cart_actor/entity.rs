use std::convert::Infallible;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::Cart;

/// Carts are rewritten whole on every change (`put`), so the entity only needs storage.
impl Entity for Cart {
    type Id = String;
    type CreateParams = Infallible;
    type UpdateParams = Infallible;
    type Action = Infallible;
    type ActionResult = ();

    const COLLECTION: &'static str = "carts";

    fn id(&self) -> &String {
        &self.user_id
    }

    fn from_create_params(_id: String, params: Infallible) -> Result<Self, FrameworkError> {
        match params {}
    }

    fn on_update(&mut self, params: Infallible) -> Result<(), FrameworkError> {
        match params {}
    }

    fn handle_action(&mut self, action: Infallible) -> Result<(), FrameworkError> {
        match action {}
    }
}
