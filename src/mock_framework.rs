//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, Filter, FrameworkError, ResourceClient, ResourceRequest};

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The test plays the actor: it reads each request off `receiver` and answers
/// through the request's responder, so success, failure and ordering are all
/// under the test's control.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Responder<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Option<Filter<T>>, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Answers the next List request from `records`, applying the client's filter.
pub async fn answer_list<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>, records: Vec<T>) -> bool {
    let Some((filter, respond_to)) = expect_list(receiver).await else {
        return false;
    };
    let matching = records
        .into_iter()
        .filter(|record| filter.as_ref().map_or(true, |f| f(record)))
        .collect();
    respond_to.send(Ok(matching)).is_ok()
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Responder<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, User, UserCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        // Test Create
        let create_task = tokio::spawn(async move {
            let user = UserCreate {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::User,
            };
            client.create(user).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        responder.send(Ok("user_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("user_1".to_string()));
    }

    #[tokio::test]
    async fn test_answer_list_applies_filter() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let users: Vec<User> = ["a@x.io", "b@x.io"]
            .iter()
            .enumerate()
            .map(|(i, email)| {
                User::from_params(
                    format!("user_{i}"),
                    UserCreate {
                        name: "N".into(),
                        email: email.to_string(),
                        password_hash: "h".into(),
                        role: Role::User,
                    },
                )
                .unwrap()
            })
            .collect();

        let task = tokio::spawn(async move {
            client
                .list(Some(Box::new(|user: &User| user.email == "b@x.io")))
                .await
        });
        assert!(answer_list(&mut receiver, users).await);
        let listed = task.await.unwrap().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "user_1");
    }

    #[tokio::test]
    async fn test_update_and_delete_helpers() {
        use crate::domain::UserPatch;

        let (client, mut receiver) = create_mock_client::<User>(10);
        let patcher = client.clone();
        let update_task = tokio::spawn(async move {
            let patch = UserPatch {
                name: Some("Renamed".into()),
                ..Default::default()
            };
            patcher.update("user_1".into(), patch).await
        });
        let (id, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, "user_1");
        assert_eq!(patch.name.as_deref(), Some("Renamed"));
        responder.send(Err(FrameworkError::NotFound(id))).unwrap();
        assert_eq!(
            update_task.await.unwrap(),
            Err(FrameworkError::NotFound("user_1".into()))
        );

        let delete_task = tokio::spawn(async move { client.delete("user_2".into()).await });
        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, "user_2");
        responder.send(Ok(())).unwrap();
        assert_eq!(delete_task.await.unwrap(), Ok(()));
    }
}
