//! # Store Messages
//!
//! Requests sent from a [`MemoryStore`](super::MemoryStore) handle to the
//! [`StoreActor`](super::StoreActor) that owns the records. Every request
//! carries an optional [`Scope`] and a oneshot channel for the reply.

use crate::collection::ListQuery;
use crate::error::StoreError;
use crate::record::{Params, Record};
use serde_json::Value;
use tokio::sync::oneshot;

/// Reply channel of one request.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Restricts a request to records whose `attribute` equals `value`.
///
/// Created records get the attribute stamped on, the way a parent-scoped
/// collection assigns its foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub attribute: String,
    pub value: Value,
}

impl Scope {
    pub fn new(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Whether the serialised `record` falls inside the scope.
    pub fn contains<R: Record>(&self, record: &R) -> bool {
        serde_json::to_value(record)
            .ok()
            .and_then(|v| v.get(&self.attribute).cloned())
            .is_some_and(|v| v == self.value)
    }

    /// Adds the scope attribute to create params, overriding caller input.
    pub fn stamp(&self, params: &mut Params) {
        params.insert(self.attribute.clone(), self.value.clone());
    }
}

/// The store's CRUD vocabulary.
#[derive(Debug)]
pub enum StoreRequest<R: Record> {
    Find {
        id: R::Id,
        scope: Option<Scope>,
        respond_to: Response<Option<R>>,
    },
    All {
        query: ListQuery,
        scope: Option<Scope>,
        respond_to: Response<Vec<R>>,
    },
    Create {
        params: Params,
        scope: Option<Scope>,
        respond_to: Response<R>,
    },
    Update {
        id: R::Id,
        params: Params,
        scope: Option<Scope>,
        respond_to: Response<R>,
    },
    Delete {
        id: R::Id,
        scope: Option<Scope>,
        respond_to: Response<()>,
    },
}
