//! Process-wide snapshot of chefs that are accepting orders.
//!
//! Dish listings consult this instead of fetching one chef per dish. The
//! snapshot is replaced wholesale when empty or older than the TTL; nothing
//! invalidates it early, so an availability toggle shows up within one TTL.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::chef_actor::ChefError;
use crate::clients::ChefClient;
use crate::clock::Clock;
use crate::domain::Chef;

pub type ActiveChefs = Arc<HashMap<String, Chef>>;

struct Snapshot {
    fetched_at: DateTime<Utc>,
    chefs: ActiveChefs,
}

pub struct ActiveChefCache {
    chefs: ChefClient,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl ActiveChefCache {
    pub fn new(chefs: ChefClient, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            chefs,
            clock,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Active chefs keyed by id, rescanning the collection when the snapshot is stale.
    ///
    /// Concurrent callers that all find it stale each rescan; the last write wins.
    #[instrument(skip(self))]
    pub async fn active_chefs(&self) -> Result<ActiveChefs, ChefError> {
        let now = self.clock.now();
        if let Some(chefs) = self.fresh(now) {
            debug!(count = chefs.len(), "Active chef cache hit");
            return Ok(chefs);
        }

        let chefs: ActiveChefs = Arc::new(self.chefs.scan_active().await?);
        info!(count = chefs.len(), "Active chef cache refreshed");
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Snapshot {
            fetched_at: now,
            chefs: chefs.clone(),
        });
        Ok(chefs)
    }

    fn fresh(&self, now: DateTime<Utc>) -> Option<ActiveChefs> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        let snapshot = guard.as_ref()?;
        if snapshot.chefs.is_empty() {
            return None;
        }
        // A clock that moved backwards counts as stale.
        let age = (now - snapshot.fetched_at).to_std().ok()?;
        (age < self.ttl).then(|| snapshot.chefs.clone())
    }
}
