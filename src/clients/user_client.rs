use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clock::Clock;
use crate::domain::{Address, Favorite, NewAddress, NotificationSettings, User, UserPatch};
use crate::user_actor::{UserAction, UserError};

/// Client for the users collection.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
    clock: Arc<dyn Clock>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    /// Returns the account for `uid`, creating a customer account on first access.
    #[instrument(skip(self, name, email))]
    pub async fn ensure_user(&self, uid: String, name: String, email: String) -> Result<User, UserError> {
        let (user, created) = self
            .inner
            .get_or_insert(User::new(uid, name, email, self.clock.now()))
            .await?;
        if created {
            info!(user_id = %user.id, "User document created");
        }
        Ok(user)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, id: String, mut patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        patch.updated_at = Some(self.clock.now());
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn is_admin(&self, id: String) -> Result<bool, UserError> {
        Ok(self.get_user(id).await?.is_some_and(|user| user.is_admin))
    }

    #[instrument(skip(self))]
    pub async fn ban(&self, id: String, reason: String) -> Result<User, UserError> {
        let at = self.clock.now();
        Ok(self.inner.perform_action(id, UserAction::Ban { reason, at }).await?)
    }

    #[instrument(skip(self))]
    pub async fn unban(&self, id: String) -> Result<User, UserError> {
        let at = self.clock.now();
        Ok(self.inner.perform_action(id, UserAction::Unban { at }).await?)
    }

    #[instrument(skip(self, token))]
    pub async fn register_push_token(&self, id: String, token: String) -> Result<User, UserError> {
        if token.trim().is_empty() {
            return Err(UserError::ValidationError("fcmToken is required".into()));
        }
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(id, UserAction::RegisterPushToken { token, at })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update_notification_settings(
        &self,
        id: String,
        settings: NotificationSettings,
    ) -> Result<User, UserError> {
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(id, UserAction::UpdateNotificationSettings { settings, at })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn promote_to_chef(&self, id: String) -> Result<User, UserError> {
        let at = self.clock.now();
        Ok(self.inner.perform_action(id, UserAction::PromoteToChef { at }).await?)
    }

    /// Creates the account if needed and sets its admin flag.
    #[instrument(skip(self))]
    pub async fn grant_admin(&self, id: String) -> Result<User, UserError> {
        self.ensure_user(id.clone(), String::new(), String::new()).await?;
        let at = self.clock.now();
        let user = self.inner.perform_action(id, UserAction::GrantAdmin { at }).await?;
        info!(user_id = %user.id, "Admin access granted");
        Ok(user)
    }

    /// Saved addresses; an account that does not exist yet has none.
    #[instrument(skip(self))]
    pub async fn addresses(&self, id: String) -> Result<Vec<Address>, UserError> {
        Ok(self.get_user(id).await?.map(|user| user.addresses).unwrap_or_default())
    }

    /// Saves an address and returns it with its assigned id.
    #[instrument(skip(self, address))]
    pub async fn add_address(&self, id: String, address: NewAddress) -> Result<Address, UserError> {
        let at = self.clock.now();
        let user = self.inner.perform_action(id, UserAction::AddAddress { address, at }).await?;
        user.addresses
            .into_iter()
            .last()
            .ok_or_else(|| UserError::ValidationError("Address is required".into()))
    }

    #[instrument(skip(self))]
    pub async fn remove_address(&self, id: String, address_id: String) -> Result<User, UserError> {
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(id, UserAction::RemoveAddress { address_id, at })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn favorites(&self, id: String) -> Result<Vec<Favorite>, UserError> {
        Ok(self.get_user(id).await?.map(|user| user.favorites).unwrap_or_default())
    }

    /// Bookmarks a dish. Returns false when it was already a favorite.
    #[instrument(skip(self, dish_name, dish_image))]
    pub async fn add_favorite(
        &self,
        id: String,
        dish_id: String,
        dish_name: String,
        dish_image: String,
    ) -> Result<bool, UserError> {
        let before = self.find_user(id.clone()).await?;
        if before.is_favorite(&dish_id) {
            debug!(%dish_id, "Dish already a favorite");
            return Ok(false);
        }
        let favorite = Favorite { dish_id, dish_name, dish_image, added_at: self.clock.now() };
        self.inner.perform_action(id, UserAction::AddFavorite { favorite }).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, id: String, dish_id: String) -> Result<User, UserError> {
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(id, UserAction::RemoveFavorite { dish_id, at })
            .await?)
    }

    /// Every account, newest first.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        let mut users = self.inner.list(|_: &User| true).await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::clock::SystemClock;

    fn start() -> UserClient {
        let (actor, inner) = ResourceActor::<User>::new(16, || "unused".to_string());
        tokio::spawn(actor.run());
        UserClient::new(inner, Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn test_ensure_user_creates_once() {
        let users = start();
        let first = users.ensure_user("u1".into(), "Salma".into(), "s@example.com".into()).await.unwrap();
        let second = users.ensure_user("u1".into(), "Other".into(), String::new()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.name, "Salma");
    }

    #[tokio::test]
    async fn test_find_user_reports_missing() {
        let users = start();
        assert_eq!(users.find_user("ghost".into()).await, Err(UserError::NotFound("User not found".into())));
        assert!(!users.is_admin("ghost".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_push_token_required() {
        let users = start();
        users.ensure_user("u1".into(), String::new(), String::new()).await.unwrap();
        assert!(matches!(
            users.register_push_token("u1".into(), " ".into()).await,
            Err(UserError::ValidationError(_))
        ));
        let user = users.register_push_token("u1".into(), "tok".into()).await.unwrap();
        assert_eq!(user.fcm_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_address_book() {
        let users = start();
        assert!(users.addresses("u1".into()).await.unwrap().is_empty());
        users.ensure_user("u1".into(), String::new(), String::new()).await.unwrap();

        let home = NewAddress { address: "12 Rue de Marseille".into(), ..Default::default() };
        let work = NewAddress { address: "Lac 2".into(), is_default: Some(true), ..Default::default() };
        let first = users.add_address("u1".into(), home).await.unwrap();
        let second = users.add_address("u1".into(), work).await.unwrap();
        assert_eq!((first.id.as_str(), second.id.as_str()), ("addr_1", "addr_2"));

        let saved = users.addresses("u1".into()).await.unwrap();
        assert!(!saved[0].is_default);
        assert!(saved[1].is_default);

        let user = users.remove_address("u1".into(), "addr_1".into()).await.unwrap();
        assert_eq!(user.addresses.len(), 1);
        assert_eq!(
            users.remove_address("ghost".into(), "addr_1".into()).await,
            Err(UserError::NotFound("User not found".into()))
        );
    }

    #[tokio::test]
    async fn test_favorites() {
        let users = start();
        users.ensure_user("u1".into(), String::new(), String::new()).await.unwrap();

        assert!(users.add_favorite("u1".into(), "dish_1".into(), "Couscous".into(), String::new()).await.unwrap());
        assert!(!users.add_favorite("u1".into(), "dish_1".into(), "Couscous".into(), String::new()).await.unwrap());
        let favorites = users.favorites("u1".into()).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].dish_name, "Couscous");

        users.remove_favorite("u1".into(), "dish_1".into()).await.unwrap();
        assert!(users.favorites("u1".into()).await.unwrap().is_empty());
    }
}
