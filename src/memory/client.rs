//! # Store Handles
//!
//! [`MemoryStore`] is the cheap, cloneable handle of a running
//! [`StoreActor`](super::StoreActor). It implements [`Collection`] over every
//! record; [`MemoryStore::scoped`] narrows it to a [`ScopedCollection`].

use super::entity::StoredRecord;
use super::message::{Scope, StoreRequest};
use super::actor::StoreActor;
use crate::collection::{Collection, ListQuery};
use crate::error::StoreError;
use crate::record::Params;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Handle to an in-memory store actor.
pub struct MemoryStore<R: StoredRecord> {
    sender: mpsc::Sender<StoreRequest<R>>,
}

impl<R: StoredRecord> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<R: StoredRecord> MemoryStore<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self { sender }
    }

    /// Starts a store actor on the current runtime.
    ///
    /// The actor stops once every handle has been dropped; await the
    /// returned handle for a clean shutdown.
    pub fn spawn(buffer_size: usize) -> (Self, JoinHandle<()>) {
        let (actor, store) = StoreActor::new(buffer_size);
        let handle = tokio::spawn(actor.run());
        (store, handle)
    }

    /// A view restricted to records whose `attribute` equals `value`.
    pub fn scoped(&self, attribute: impl Into<String>, value: impl Into<Value>) -> ScopedCollection<R> {
        ScopedCollection {
            store: self.clone(),
            scope: Scope::new(attribute, value),
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest<R>,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    async fn find_in(&self, id: R::Id, scope: Option<Scope>) -> Result<Option<R>, StoreError> {
        self.request(|respond_to| StoreRequest::Find {
            id,
            scope,
            respond_to,
        })
        .await
    }

    async fn all_in(&self, query: ListQuery, scope: Option<Scope>) -> Result<Vec<R>, StoreError> {
        self.request(|respond_to| StoreRequest::All {
            query,
            scope,
            respond_to,
        })
        .await
    }

    async fn create_in(&self, params: Params, scope: Option<Scope>) -> Result<R, StoreError> {
        self.request(|respond_to| StoreRequest::Create {
            params,
            scope,
            respond_to,
        })
        .await
    }

    async fn update_in(&self, record: &R, params: Params, scope: Option<Scope>) -> Result<R, StoreError> {
        let id = record
            .id()
            .ok_or_else(|| StoreError::NotFound(String::from("<unsaved>")))?;
        self.request(|respond_to| StoreRequest::Update {
            id,
            params,
            scope,
            respond_to,
        })
        .await
    }

    async fn delete_in(&self, record: &R, scope: Option<Scope>) -> Result<(), StoreError> {
        let id = record
            .id()
            .ok_or_else(|| StoreError::NotFound(String::from("<unsaved>")))?;
        self.request(|respond_to| StoreRequest::Delete {
            id,
            scope,
            respond_to,
        })
        .await
    }
}

#[async_trait]
impl<R: StoredRecord> Collection<R> for MemoryStore<R> {
    async fn find_by_id(&self, id: &R::Id) -> Result<Option<R>, StoreError> {
        self.find_in(id.clone(), None).await
    }

    async fn all(&self, query: &ListQuery) -> Result<Vec<R>, StoreError> {
        self.all_in(query.clone(), None).await
    }

    async fn create(&self, attrs: Params) -> Result<R, StoreError> {
        self.create_in(attrs, None).await
    }

    async fn update(&self, record: &R, attrs: Params) -> Result<R, StoreError> {
        self.update_in(record, attrs, None).await
    }

    async fn delete(&self, record: &R) -> Result<(), StoreError> {
        self.delete_in(record, None).await
    }
}

/// A [`MemoryStore`] restricted to one [`Scope`].
pub struct ScopedCollection<R: StoredRecord> {
    store: MemoryStore<R>,
    scope: Scope,
}

#[async_trait]
impl<R: StoredRecord> Collection<R> for ScopedCollection<R> {
    async fn find_by_id(&self, id: &R::Id) -> Result<Option<R>, StoreError> {
        self.store.find_in(id.clone(), Some(self.scope.clone())).await
    }

    async fn all(&self, query: &ListQuery) -> Result<Vec<R>, StoreError> {
        self.store.all_in(query.clone(), Some(self.scope.clone())).await
    }

    async fn create(&self, attrs: Params) -> Result<R, StoreError> {
        self.store.create_in(attrs, Some(self.scope.clone())).await
    }

    async fn update(&self, record: &R, attrs: Params) -> Result<R, StoreError> {
        self.store
            .update_in(record, attrs, Some(self.scope.clone()))
            .await
    }

    async fn delete(&self, record: &R) -> Result<(), StoreError> {
        self.store.delete_in(record, Some(self.scope.clone())).await
    }
}
