//! # Actor Framework
//!
//! Every document collection of the marketplace is owned by one [`ResourceActor`].
//! Callers talk to it through a cloneable [`ResourceClient`]; each call is a message
//! with a oneshot reply channel, so all mutations of a single document are serialized
//! inside the owning actor. Nothing here spans two collections: cross-document
//! consistency is the job of the domain clients.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Errors surfaced by the collection actors.
///
/// `Validation` and `Forbidden` are raised by entity hooks when a requested
/// change is rejected; the two channel variants mean the collection is unreachable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
}

/// Trait that any stored document must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type UpdateParams: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Collection name, used in logs.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    /// Construct the full document from a generated id and creation parameters.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, FrameworkError>;

    /// Partial merge of an update into the stored document.
    fn on_update(&mut self, params: Self::UpdateParams) -> Result<(), FrameworkError>;

    /// Domain-specific mutation, applied atomically inside the owning actor.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, FrameworkError>;
}

/// Predicate used by filtered reads.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Put {
        item: T,
        respond_to: Response<()>,
    },
    GetOrInsert {
        item: T,
        respond_to: Response<(T, bool)>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        params: T::UpdateParams,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    pub async fn run(mut self) {
        info!(collection = T::COLLECTION, "Collection actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let id = (self.next_id_fn)();
                    let result = T::from_create_params(id.clone(), params).map(|item| {
                        self.store.insert(id.clone(), item.clone());
                        debug!(collection = T::COLLECTION, id = %id, "Document created");
                        item
                    });
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Put { item, respond_to } => {
                    self.store.insert(item.id().clone(), item);
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::GetOrInsert { item, respond_to } => {
                    let id = item.id().clone();
                    let result = match self.store.get(&id) {
                        Some(existing) => (existing.clone(), false),
                        None => {
                            self.store.insert(id.clone(), item.clone());
                            debug!(collection = T::COLLECTION, id = %id, "Document created");
                            (item, true)
                        }
                    };
                    let _ = respond_to.send(Ok(result));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::Update { id, params, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.on_update(params).map(|_| item.clone()),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = self
                        .store
                        .remove(&id)
                        .ok_or_else(|| FrameworkError::NotFound(id.to_string()));
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self.store.values().filter(|item| filter(item)).cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
            }
        }
        info!(collection = T::COLLECTION, "Collection actor stopped");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    /// Writes the document under its own id, replacing any previous version.
    pub async fn put(&self, item: T) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Put { item, respond_to }).await
    }

    /// Returns the stored document with the same id, or stores `item`.
    /// The flag is true when `item` was inserted.
    pub async fn get_or_insert(&self, item: T) -> Result<(T, bool), FrameworkError> {
        self.request(|respond_to| ResourceRequest::GetOrInsert { item, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, params: T::UpdateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, params, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }

    pub async fn list(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        let filter: Filter<T> = Box::new(filter);
        self.request(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        value: i64,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    enum CounterAction {
        Add(i64),
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type UpdateParams = String;
        type Action = CounterAction;
        type ActionResult = i64;

        const COLLECTION: &'static str = "counters";

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, FrameworkError> {
            if params.label.is_empty() {
                return Err(FrameworkError::Validation("label required".into()));
            }
            Ok(Self { id, label: params.label, value: 0 })
        }

        fn on_update(&mut self, label: String) -> Result<(), FrameworkError> {
            self.label = label;
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<i64, FrameworkError> {
            match action {
                CounterAction::Add(n) if self.value + n < 0 => {
                    Err(FrameworkError::Validation("counter cannot go negative".into()))
                }
                CounterAction::Add(n) => {
                    self.value += n;
                    Ok(self.value)
                }
            }
        }
    }

    fn start() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("counter_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_create_action_and_list() {
        let client = start();

        let created = client.create(CounterCreate { label: "a".into() }).await.unwrap();
        assert_eq!(created.id, "counter_1");
        client.create(CounterCreate { label: "b".into() }).await.unwrap();

        assert_eq!(client.perform_action("counter_1".into(), CounterAction::Add(5)).await, Ok(5));
        let rejected = client.perform_action("counter_1".into(), CounterAction::Add(-9)).await;
        assert!(matches!(rejected, Err(FrameworkError::Validation(_))));

        // A rejected action leaves the document untouched
        let stored = client.get("counter_1".into()).await.unwrap().unwrap();
        assert_eq!(stored.value, 5);

        let positive = client.list(|c: &Counter| c.value > 0).await.unwrap();
        assert_eq!(positive.len(), 1);
        assert_eq!(positive[0].label, "a");
    }

    #[tokio::test]
    async fn test_put_update_delete() {
        let client = start();

        let item = Counter { id: "fixed".into(), label: "x".into(), value: 3 };
        client.put(item.clone()).await.unwrap();
        assert_eq!(client.get("fixed".into()).await.unwrap(), Some(item));

        let updated = client.update("fixed".into(), "y".into()).await.unwrap();
        assert_eq!(updated.label, "y");

        let other = Counter { id: "fixed".into(), label: "other".into(), value: 0 };
        let (kept, inserted) = client.get_or_insert(other).await.unwrap();
        assert!(!inserted);
        assert_eq!(kept.label, "y");

        let removed = client.delete("fixed".into()).await.unwrap();
        assert_eq!(removed.value, 3);
        assert_eq!(client.delete("fixed".into()).await, Err(FrameworkError::NotFound("fixed".into())));
        assert_eq!(
            client.update("missing".into(), "z".into()).await,
            Err(FrameworkError::NotFound("missing".into()))
        );
    }

    #[tokio::test]
    async fn test_closed_actor_reports_actor_closed() {
        let (actor, client) = ResourceActor::<Counter>::new(1, || "never".to_string());
        drop(actor);
        assert_eq!(client.get("x".into()).await, Err(FrameworkError::ActorClosed));
    }
}
