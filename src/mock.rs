//! # Mock Collection & Testing Guide
//!
//! [`MockCollection<R>`] implements [`Collection<R>`] from a queue of
//! expectations instead of real storage. Each store call pops the next
//! expectation; a call that was not expected panics, failing the test.
//!
//! ## When to use the mock vs the memory store
//!
//! | | MockCollection | MemoryStore |
//! |---|---|---|
//! | **State** | none, scripted replies | real records |
//! | **Error injection** | any `StoreError`, one line | needs a record that fails its hooks |
//! | **Use case** | proving which store calls happen (e.g. none after a 403) | end-to-end behaviour |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mock = MockCollection::<Pie>::new();
//! mock.expect_find(1).return_ok(Some(pie));
//! // no expect_delete(): a delete after a denied authorization would panic
//!
//! let dispatcher = ActionDispatcher::<Pie, ()>::builder(pies)
//!     .locator(FixedLocator::new(Arc::new(mock.clone())))
//!     .authorization(|_: &(), _: Action, _: Option<&Pie>| false)
//!     .build()?;
//!
//! let outcome = dispatcher.dispatch(&(), ActionRequest::destroy("1")).await?;
//! assert_eq!(outcome.status, StatusCode::FORBIDDEN);
//! mock.verify();
//! ```

use crate::collection::{Collection, ListQuery};
use crate::error::StoreError;
use crate::record::{Params, Record};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Expectation<R: Record> {
    Find {
        id: R::Id,
        response: Result<Option<R>, StoreError>,
    },
    All {
        response: Result<Vec<R>, StoreError>,
    },
    Create {
        response: Result<R, StoreError>,
    },
    Update {
        response: Result<R, StoreError>,
    },
    Delete {
        response: Result<(), StoreError>,
    },
}

/// Everything the mock saw, for assertions after the call.
#[derive(Debug, Clone, Default)]
pub struct Received {
    pub queries: Vec<ListQuery>,
    pub create_params: Vec<Params>,
    pub update_params: Vec<Params>,
    pub deletes: usize,
}

impl Received {
    /// Number of create/update/delete calls.
    pub fn mutations(&self) -> usize {
        self.create_params.len() + self.update_params.len() + self.deletes
    }
}

type Queue<R> = Arc<Mutex<VecDeque<Expectation<R>>>>;

/// A scripted [`Collection`].
pub struct MockCollection<R: Record> {
    expectations: Queue<R>,
    received: Arc<Mutex<Received>>,
}

impl<R: Record> Clone for MockCollection<R> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            received: self.received.clone(),
        }
    }
}

impl<R: Record> Default for MockCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R: Record> MockCollection<R> {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            received: Arc::new(Mutex::new(Received::default())),
        }
    }

    pub fn expect_find(&self, id: R::Id) -> ExpectationBuilder<R, Option<R>> {
        self.builder(Box::new(move |response| Expectation::Find { id, response }))
    }

    pub fn expect_all(&self) -> ExpectationBuilder<R, Vec<R>> {
        self.builder(Box::new(|response| Expectation::All { response }))
    }

    pub fn expect_create(&self) -> ExpectationBuilder<R, R> {
        self.builder(Box::new(|response| Expectation::Create { response }))
    }

    pub fn expect_update(&self) -> ExpectationBuilder<R, R> {
        self.builder(Box::new(|response| Expectation::Update { response }))
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<R, ()> {
        self.builder(Box::new(|response| Expectation::Delete { response }))
    }

    /// A snapshot of the calls received so far.
    pub fn received(&self) -> Received {
        lock(&self.received).clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<T>(&self, make: MakeExpectation<R, T>) -> ExpectationBuilder<R, T> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make,
        }
    }

    fn next(&self, call: &str) -> Expectation<R> {
        lock(&self.expectations)
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected {call} request: no expectations left"))
    }
}

type MakeExpectation<R, T> = Box<dyn FnOnce(Result<T, StoreError>) -> Expectation<R> + Send>;

/// Sets the reply of one expected call.
pub struct ExpectationBuilder<R: Record, T> {
    expectations: Queue<R>,
    make: MakeExpectation<R, T>,
}

impl<R: Record, T> ExpectationBuilder<R, T> {
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, StoreError>) {
        let expectation = (self.make)(response);
        lock(&self.expectations).push_back(expectation);
    }
}

#[async_trait]
impl<R: Record> Collection<R> for MockCollection<R> {
    async fn find_by_id(&self, id: &R::Id) -> Result<Option<R>, StoreError> {
        match self.next("find") {
            Expectation::Find { id: expected, response } => {
                assert_eq!(&expected, id, "find called with an unexpected id");
                response
            }
            _ => panic!("Unexpected find request or expectation mismatch"),
        }
    }

    async fn all(&self, query: &ListQuery) -> Result<Vec<R>, StoreError> {
        lock(&self.received).queries.push(query.clone());
        match self.next("all") {
            Expectation::All { response } => response,
            _ => panic!("Unexpected all request or expectation mismatch"),
        }
    }

    async fn create(&self, attrs: Params) -> Result<R, StoreError> {
        lock(&self.received).create_params.push(attrs);
        match self.next("create") {
            Expectation::Create { response } => response,
            _ => panic!("Unexpected create request or expectation mismatch"),
        }
    }

    async fn update(&self, _record: &R, attrs: Params) -> Result<R, StoreError> {
        lock(&self.received).update_params.push(attrs);
        match self.next("update") {
            Expectation::Update { response } => response,
            _ => panic!("Unexpected update request or expectation mismatch"),
        }
    }

    async fn delete(&self, _record: &R) -> Result<(), StoreError> {
        lock(&self.received).deletes += 1;
        match self.next("delete") {
            Expectation::Delete { response } => response,
            _ => panic!("Unexpected delete request or expectation mismatch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    struct User {
        id: Option<u32>,
        email: String,
    }

    impl Record for User {
        type Id = u32;
        fn id(&self) -> Option<u32> {
            self.id
        }
    }

    #[tokio::test]
    async fn test_mock_collection_with_expectations() {
        let mock = MockCollection::<User>::new();
        let user = User {
            id: Some(1),
            email: "test@example.com".into(),
        };
        mock.expect_create().return_ok(user.clone());
        mock.expect_find(1).return_ok(Some(user.clone()));

        let created = mock.create(Params::new()).await.unwrap();
        assert_eq!(created, user);
        let fetched = mock.find_by_id(&1).await.unwrap();
        assert_eq!(fetched.unwrap().email, "test@example.com");

        assert_eq!(mock.received().create_params.len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_collection_injects_errors() {
        let mock = MockCollection::<User>::new();
        mock.expect_all().return_err(StoreError::Closed);
        let result = mock.all(&ListQuery::default()).await;
        assert!(matches!(result, Err(StoreError::Closed)));
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected delete request")]
    async fn test_unexpected_call_panics() {
        let mock = MockCollection::<User>::new();
        let _ = mock.delete(&User::default()).await;
    }
}
