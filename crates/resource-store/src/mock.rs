//! # Mock Store & Testing Guide
//!
//! `MockStore<T>` hands out a real [`StoreClient<T>`] whose requests are answered from a
//! queue of expectations instead of a repository. Use it to test code *around* the store
//! (controllers, request handling) deterministically, and to inject failures that a real
//! SQLite database will not produce on demand.
//!
//! ## When to use Mocks vs Real Stores
//!
//! | Feature | MockStore | StoreActor + SQLite |
//! |---------|-----------|---------------------|
//! | **State** | None (scripted answers) | Real rows |
//! | **Error Injection** | Easy (`return_err`) | Hard |
//! | **Use Case** | Logic around the client | The store itself or full flows |
//!
//! ## Example
//!
//! ```rust
//! use resource_store::mock::MockStore;
//! use resource_store::{ResourceEntity, StoreError};
//!
//! #[derive(Clone, Debug, PartialEq)] struct User { id: i64, email: String }
//! #[derive(Debug)] struct UserDraft { email: String }
//!
//! impl ResourceEntity for User {
//!     type Id = i64; type Draft = UserDraft; type Query = ();
//!     fn id(&self) -> i64 { self.id }
//!     fn revise(&self, d: UserDraft) -> Self { Self { id: self.id, email: d.email } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockStore::<User>::new();
//!     mock.expect_find_by_id(1).return_ok(Some(User { id: 1, email: "a@x.com".into() }));
//!     mock.expect_find_all().return_err(StoreError::Storage("disk full".into()));
//!
//!     let client = mock.client();
//!     assert_eq!(client.find_by_id(1).await.unwrap().unwrap().email, "a@x.com");
//!     assert!(matches!(client.find_all().await, Err(StoreError::Storage(_))));
//!
//!     mock.verify();
//! }
//! ```
//!
//! A request that does not match the next expectation panics the mock's background task;
//! the caller then sees [`StoreError::Dropped`].

use crate::client::StoreClient;
use crate::entity::ResourceEntity;
use crate::error::StoreError;
use crate::message::StoreRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// An expected request and the scripted answer.
enum Expectation<T: ResourceEntity> {
    FindAll {
        response: Result<Vec<T>, StoreError>,
    },
    FindById {
        id: T::Id,
        response: Result<Option<T>, StoreError>,
    },
    Query {
        response: Result<Vec<T>, StoreError>,
    },
    Insert {
        response: Result<T, StoreError>,
    },
    Save {
        id: T::Id,
        response: Result<T, StoreError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), StoreError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A store client backed by a queue of expectations.
pub struct MockStore<T: ResourceEntity> {
    client: StoreClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ResourceEntity> Default for MockStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResourceEntity> MockStore<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue
                    .lock()
                    .expect("mock expectations poisoned")
                    .pop_front();

                match (request, expectation) {
                    (StoreRequest::FindAll { respond_to }, Some(Expectation::FindAll { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::FindById { id, respond_to },
                        Some(Expectation::FindById { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "FindById for an unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Query { respond_to, .. }, Some(Expectation::Query { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Insert { respond_to, .. }, Some(Expectation::Insert { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Save { entity, respond_to },
                        Some(Expectation::Save { id: expected, response }),
                    ) => {
                        assert_eq!(entity.id(), expected, "Save for an unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Delete { entity, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) => {
                        assert_eq!(entity.id(), expected, "Delete for an unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected store request: {request:?}");
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    fn expect<R>(
        &mut self,
        wrap: impl FnOnce(Result<R, StoreError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_find_all(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(|response| Expectation::FindAll { response })
    }

    pub fn expect_find_by_id(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.expect(move |response| Expectation::FindById { id, response })
    }

    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(|response| Expectation::Query { response })
    }

    pub fn expect_insert(&mut self) -> ExpectationBuilder<T, T> {
        self.expect(|response| Expectation::Insert { response })
    }

    pub fn expect_save(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |response| Expectation::Save { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.expect(move |response| Expectation::Delete { id, response })
    }

    /// Panics unless every expectation has been consumed.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .expect("mock expectations poisoned")
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Fluent builder that queues one expectation.
pub struct ExpectationBuilder<T: ResourceEntity, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Result<R, StoreError>) -> Expectation<T> + Send>,
}

impl<T: ResourceEntity, R> ExpectationBuilder<T, R> {
    /// Answers the request successfully with `value`.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Answers the request with `error`.
    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.wrap)(response);
        self.expectations
            .lock()
            .expect("mock expectations poisoned")
            .push_back(expectation);
    }
}
