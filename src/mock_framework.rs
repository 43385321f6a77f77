//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_action`] to answer each request
//! the client sends, including with failures a real collection never produces.

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client talks to a channel the test owns instead of a running collection
/// actor, so the test decides every reply: success, a domain error, or a dropped
/// responder (seen by the client as an unreachable store).
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Filter<T>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::domain::{Dish, DishCreate};
    use chrono::Utc;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Dish>(10);

        let create_task = tokio::spawn(async move {
            let params: DishCreate = serde_json::from_value(serde_json::json!({"name": "Ojja", "price": 9.0})).unwrap();
            client.create(params).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Ojja");
        let mut params = payload;
        params.created_at = Some(Utc::now());
        let dish = <Dish as Entity>::from_create_params("dish_1".to_string(), params).unwrap();
        responder.send(Ok(dish.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(dish));
    }

    #[tokio::test]
    async fn test_list_filter_is_forwarded() {
        let (client, mut receiver) = create_mock_client::<Dish>(10);
        let list_task = tokio::spawn(async move { client.list(|dish: &Dish| dish.is_available).await });

        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let params: DishCreate = serde_json::from_value(serde_json::json!({"name": "Ojja", "price": 9.0})).unwrap();
        let mut dish = <Dish as Entity>::from_create_params("dish_1".to_string(), params).unwrap();
        assert!(filter(&dish));
        dish.is_available = false;
        assert!(!filter(&dish));
        responder.send(Err(FrameworkError::ActorClosed)).unwrap();

        assert_eq!(list_task.await.unwrap(), Err(FrameworkError::ActorClosed));
    }

    #[tokio::test]
    async fn test_dropped_responder() {
        let (client, mut receiver) = create_mock_client::<Dish>(10);
        let get_task = tokio::spawn(async move { client.get("dish_9".to_string()).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, "dish_9");
        drop(responder);

        assert_eq!(get_task.await.unwrap(), Err(FrameworkError::ActorDropped));
    }
}
