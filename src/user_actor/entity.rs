use std::convert::Infallible;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{User, UserPatch, UserRole};
use super::actions::UserAction;

impl Entity for User {
    type Id = String;
    type CreateParams = Infallible;
    type UpdateParams = UserPatch;
    type Action = UserAction;
    type ActionResult = User;

    const COLLECTION: &'static str = "users";

    fn id(&self) -> &String {
        &self.id
    }

    /// Users are keyed by the identity provider's uid and are written with
    /// `put`/`get_or_insert`, never through generated ids.
    fn from_create_params(_id: String, params: Infallible) -> Result<Self, FrameworkError> {
        match params {}
    }

    /// Updates the user's profile information.
    ///
    /// # Fields Updated
    /// - `name`, `phone`, `profileImage`
    fn on_update(&mut self, patch: UserPatch) -> Result<(), FrameworkError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(profile_image) = patch.profile_image {
            self.profile_image = profile_image;
        }
        if let Some(at) = patch.updated_at {
            self.updated_at = at;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<User, FrameworkError> {
        match action {
            UserAction::Ban { reason, at } => {
                self.is_banned = true;
                self.ban_reason = Some(reason);
                self.banned_at = Some(at);
                self.updated_at = at;
            }
            UserAction::Unban { at } => {
                self.is_banned = false;
                self.ban_reason = None;
                self.banned_at = None;
                self.updated_at = at;
            }
            UserAction::RegisterPushToken { token, at } => {
                self.fcm_token = Some(token);
                self.updated_at = at;
            }
            UserAction::UpdateNotificationSettings { settings, at } => {
                self.notification_settings = settings;
                self.updated_at = at;
            }
            UserAction::PromoteToChef { at } => {
                if self.role == UserRole::Customer {
                    self.role = UserRole::Chef;
                }
                self.updated_at = at;
            }
            UserAction::GrantAdmin { at } => {
                self.is_admin = true;
                self.role = UserRole::Admin;
                self.updated_at = at;
            }
            UserAction::AddAddress { address, at } => {
                if address.address.trim().is_empty() {
                    return Err(FrameworkError::Validation("Address is required".into()));
                }
                self.add_address(address, at);
                self.updated_at = at;
            }
            UserAction::RemoveAddress { address_id, at } => {
                self.addresses.retain(|a| a.id != address_id);
                self.updated_at = at;
            }
            UserAction::AddFavorite { favorite } => {
                if !self.is_favorite(&favorite.dish_id) {
                    self.updated_at = favorite.added_at;
                    self.favorites.push(favorite);
                }
            }
            UserAction::RemoveFavorite { dish_id, at } => {
                self.favorites.retain(|f| f.dish_id != dish_id);
                self.updated_at = at;
            }
        }
        Ok(self.clone())
    }
}
