use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::actor_framework::ResourceClient;
use crate::chef_actor::{ChefAction, ChefError};
use crate::clock::Clock;
use crate::domain::{Chef, ChefPatch, ChefRegistration};
use super::UserClient;

/// Client for the cookers collection. Chef documents are keyed by the owning user id.
#[derive(Clone)]
pub struct ChefClient {
    inner: ResourceClient<Chef>,
    users: UserClient,
    clock: Arc<dyn Clock>,
}

impl_client_methods!(ChefClient, Chef, ChefError, chef);

impl ChefClient {
    pub fn new(inner: ResourceClient<Chef>, users: UserClient, clock: Arc<dyn Clock>) -> Self {
        Self { inner, users, clock }
    }

    /// Registers `user_id` as a chef: creates the user if needed, writes the chef
    /// document and switches the user's role.
    ///
    /// Registering again rewrites the profile but keeps verification and running totals.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, user_id: String, registration: ChefRegistration) -> Result<Chef, ChefError> {
        if user_id.trim().is_empty() {
            return Err(ChefError::ValidationError("userId is required".into()));
        }
        let now = self.clock.now();

        self.users
            .ensure_user(user_id.clone(), registration.name.clone(), String::new())
            .await?;

        let mut chef = Chef::register(user_id.clone(), registration, now);
        if let Some(previous) = self.get_chef(user_id.clone()).await? {
            chef.is_verified = previous.is_verified;
            chef.verified_at = previous.verified_at;
            chef.rating = previous.rating;
            chef.total_orders = previous.total_orders;
            chef.total_earnings = previous.total_earnings;
            chef.created_at = previous.created_at;
        }
        self.inner.put(chef.clone()).await?;
        self.users.promote_to_chef(user_id).await?;

        info!(chef_id = %chef.id, "Chef registered");
        Ok(chef)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, chef_id: String, mut patch: ChefPatch) -> Result<Chef, ChefError> {
        patch.updated_at = Some(self.clock.now());
        Ok(self.inner.update(chef_id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_availability(&self, chef_id: String, active: bool) -> Result<Chef, ChefError> {
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(chef_id, ChefAction::SetAvailability { active, at })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn verify(&self, chef_id: String) -> Result<Chef, ChefError> {
        let at = self.clock.now();
        Ok(self.inner.perform_action(chef_id, ChefAction::Verify { at }).await?)
    }

    #[instrument(skip(self))]
    pub async fn record_completed_order(&self, chef_id: String, earnings: f64) -> Result<Chef, ChefError> {
        let at = self.clock.now();
        Ok(self
            .inner
            .perform_action(chef_id, ChefAction::RecordCompletedOrder { earnings, at })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn is_registered(&self, user_id: String) -> Result<bool, ChefError> {
        if user_id.is_empty() {
            return Ok(false);
        }
        Ok(self.get_chef(user_id).await?.is_some())
    }

    #[instrument(skip(self))]
    pub async fn list_chefs(&self) -> Result<Vec<Chef>, ChefError> {
        Ok(self.inner.list(|_: &Chef| true).await?)
    }

    /// Full scan of chefs currently accepting orders, keyed by id.
    #[instrument(skip(self))]
    pub async fn scan_active(&self) -> Result<HashMap<String, Chef>, ChefError> {
        let active = self.inner.list(|chef: &Chef| chef.is_active).await?;
        Ok(active.into_iter().map(|chef| (chef.id.clone(), chef)).collect())
    }
}
