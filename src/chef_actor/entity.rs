use std::convert::Infallible;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{round_money, Chef, ChefPatch};
use super::actions::ChefAction;

impl Entity for Chef {
    type Id = String;
    type CreateParams = Infallible;
    type UpdateParams = ChefPatch;
    type Action = ChefAction;
    type ActionResult = Chef;

    const COLLECTION: &'static str = "cookers";

    fn id(&self) -> &String {
        &self.id
    }

    /// Chef documents share the owning user's id and are written with `put`.
    fn from_create_params(_id: String, params: Infallible) -> Result<Self, FrameworkError> {
        match params {}
    }

    /// Partial profile update. Running totals, flags and rating are not editable here.
    fn on_update(&mut self, patch: ChefPatch) -> Result<(), FrameworkError> {
        if let Some(settings) = &patch.delivery_settings {
            if settings.delivery_fee < 0.0 || settings.delivery_radius < 0.0 {
                return Err(FrameworkError::Validation(
                    "Delivery fee and radius must not be negative".into(),
                ));
            }
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(specialties) = patch.specialties {
            self.specialties = specialties;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(profile_image) = patch.profile_image {
            self.profile_image = profile_image;
        }
        if let Some(working_hours) = patch.working_hours {
            self.working_hours = working_hours;
        }
        if let Some(delivery_settings) = patch.delivery_settings {
            self.delivery_settings = delivery_settings;
        }
        if let Some(at) = patch.updated_at {
            self.updated_at = at;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ChefAction) -> Result<Chef, FrameworkError> {
        match action {
            ChefAction::SetAvailability { active, at } => {
                self.is_active = active;
                self.updated_at = at;
            }
            ChefAction::Verify { at } => {
                self.is_verified = true;
                self.verified_at = Some(at);
                self.updated_at = at;
            }
            ChefAction::RecordCompletedOrder { earnings, at } => {
                if earnings < 0.0 {
                    return Err(FrameworkError::Validation("Earnings must not be negative".into()));
                }
                self.total_earnings = round_money(self.total_earnings + earnings);
                self.total_orders += 1;
                self.updated_at = at;
            }
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChefRegistration, DeliverySettings};
    use chrono::Utc;

    #[test]
    fn test_registration_defaults() {
        let chef = Chef::register("u1", ChefRegistration::default(), Utc::now());
        assert_eq!(chef.id, "u1");
        assert!(chef.is_active);
        assert!(!chef.is_verified);
        assert!(chef.working_hours.monday.is_open);
        assert!(!chef.working_hours.sunday.is_open);
        assert_eq!(chef.delivery_settings.delivery_fee, 3.0);
    }

    #[test]
    fn test_completed_order_credit() {
        let now = Utc::now();
        let mut chef = Chef::register("u1", ChefRegistration::default(), now);
        chef.handle_action(ChefAction::RecordCompletedOrder { earnings: 37.0, at: now }).unwrap();
        let chef = chef
            .handle_action(ChefAction::RecordCompletedOrder { earnings: 12.5, at: now })
            .unwrap();
        assert_eq!(chef.total_earnings, 49.5);
        assert_eq!(chef.total_orders, 2);
    }

    #[test]
    fn test_negative_delivery_fee_rejected() {
        let now = Utc::now();
        let mut chef = Chef::register("u1", ChefRegistration::default(), now);
        let patch = ChefPatch {
            name: Some("New name".into()),
            delivery_settings: Some(DeliverySettings { delivery_fee: -1.0, ..Default::default() }),
            ..Default::default()
        };
        assert!(matches!(chef.on_update(patch), Err(FrameworkError::Validation(_))));
        assert_eq!(chef.name, "");
    }
}
