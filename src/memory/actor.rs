//! # Store Actor
//!
//! The [`StoreActor`] owns the records of one type and processes
//! [`StoreRequest`]s sequentially in its own task, so the record map needs no
//! lock. Requests from concurrent callers are simply serialised; there is no
//! other conflict resolution.

use super::client::MemoryStore;
use super::entity::StoredRecord;
use super::message::{Scope, StoreRequest};
use crate::collection::{ListQuery, SortDirection};
use crate::error::StoreError;
use crate::record::{short_type_name, Params, Record};
use crate::validation::ValidationErrors;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the record map and answers store requests.
///
/// # Usage
///
/// ```rust,ignore
/// let (actor, store) = StoreActor::<Pie>::new(32);
/// tokio::spawn(actor.run());
/// let pie = store.create(params).await?;
/// ```
pub struct StoreActor<R: StoredRecord> {
    receiver: mpsc::Receiver<StoreRequest<R>>,
    records: HashMap<R::Id, R>,
    order: Vec<R::Id>,
    next_id: u64,
}

impl<R: StoredRecord> StoreActor<R> {
    /// Creates the actor and the handle used to reach it.
    ///
    /// `buffer_size` bounds the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, MemoryStore<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        };
        (actor, MemoryStore::new(sender))
    }

    /// Processes requests until every handle has been dropped.
    pub async fn run(mut self) {
        let record_type = short_type_name::<R>();
        info!(record_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Find {
                    id,
                    scope,
                    respond_to,
                } => {
                    let item = self.get(&id, scope.as_ref()).cloned();
                    debug!(record_type, %id, found = item.is_some(), "Find");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::All {
                    query,
                    scope,
                    respond_to,
                } => {
                    let items = self.all(&query, scope.as_ref());
                    debug!(record_type, count = items.len(), ?query, "All");
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Create {
                    params,
                    scope,
                    respond_to,
                } => {
                    debug!(record_type, ?params, "Create");
                    let result = self.create(params, scope.as_ref());
                    match &result {
                        Ok(item) => {
                            info!(record_type, id = ?item.to_param(), size = self.records.len(), "Created")
                        }
                        Err(e) => warn!(record_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    id,
                    params,
                    scope,
                    respond_to,
                } => {
                    debug!(record_type, %id, ?params, "Update");
                    let result = self.update(&id, &params, scope.as_ref());
                    match &result {
                        Ok(_) => info!(record_type, %id, "Updated"),
                        Err(e) => warn!(record_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete {
                    id,
                    scope,
                    respond_to,
                } => {
                    debug!(record_type, %id, "Delete");
                    let result = self.delete(&id, scope.as_ref());
                    match &result {
                        Ok(()) => info!(record_type, %id, size = self.records.len(), "Deleted"),
                        Err(e) => warn!(record_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(record_type, size = self.records.len(), "Shutdown");
    }

    fn get(&self, id: &R::Id, scope: Option<&Scope>) -> Option<&R> {
        self.records
            .get(id)
            .filter(|r| scope.map_or(true, |s| s.contains(*r)))
    }

    fn all(&self, query: &ListQuery, scope: Option<&Scope>) -> Vec<R> {
        let mut items: Vec<R> = self
            .order
            .iter()
            .filter_map(|id| self.get(id, scope))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            let mut keyed: Vec<(Value, R)> = items
                .into_iter()
                .map(|r| (attribute_of(&r, &sort.attribute), r))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| match sort.direction {
                SortDirection::Asc => compare_values(a, b),
                SortDirection::Desc => compare_values(b, a),
            });
            items = keyed.into_iter().map(|(_, r)| r).collect();
        }

        match query.page {
            Some(page) => items
                .into_iter()
                .skip(page.offset())
                .take(page.per_page as usize)
                .collect(),
            None => items,
        }
    }

    fn create(&mut self, mut params: Params, scope: Option<&Scope>) -> Result<R, StoreError> {
        if let Some(scope) = scope {
            scope.stamp(&mut params);
        }

        let seq = self.next_id;
        let item = R::from_params(seq, &params).map_err(StoreError::Invalid)?;
        item.validate().map_err(StoreError::Invalid)?;
        let id = item
            .id()
            .ok_or_else(|| StoreError::Invalid(ValidationErrors::new().with("id", "can't be blank")))?;
        if self.records.contains_key(&id) {
            return Err(StoreError::Invalid(
                ValidationErrors::new().with("id", "has already been taken"),
            ));
        }

        self.next_id += 1;
        self.order.push(id.clone());
        self.records.insert(id, item.clone());
        Ok(item)
    }

    fn update(&mut self, id: &R::Id, params: &Params, scope: Option<&Scope>) -> Result<R, StoreError> {
        let mut draft = self
            .get(id, scope)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        draft.apply(params).map_err(StoreError::Invalid)?;
        draft.validate().map_err(StoreError::Invalid)?;
        // records stay under the key they were created with
        if draft.id().as_ref() != Some(id) {
            return Err(StoreError::Invalid(ValidationErrors::new().with("id", "can't be changed")));
        }
        self.records.insert(id.clone(), draft.clone());
        Ok(draft)
    }

    fn delete(&mut self, id: &R::Id, scope: Option<&Scope>) -> Result<(), StoreError> {
        let item = self
            .get(id, scope)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        item.before_destroy().map_err(StoreError::Constrained)?;
        self.records.remove(id);
        self.order.retain(|k| k != id);
        Ok(())
    }
}

fn attribute_of<R: Record>(record: &R, attribute: &str) -> Value {
    serde_json::to_value(record)
        .ok()
        .and_then(|v| v.get(attribute).cloned())
        .unwrap_or(Value::Null)
}

/// Total order over JSON values: null < bool < number < string < others.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Integers compare exactly; floats only when either side is one.
fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    match (x.as_u64(), y.as_u64()) {
        (Some(x), Some(y)) => return x.cmp(&y),
        // u64 beyond i64::MAX is above every negative
        (Some(_), None) if y.is_i64() => return Ordering::Greater,
        (None, Some(_)) if x.is_i64() => return Ordering::Less,
        _ => {}
    }
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x.cmp(&y);
    }
    let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use serde::Serialize;
    use serde_json::json;

    /// Keyed by its slug rather than the store sequence.
    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    struct Post {
        slug: String,
        title: String,
    }

    impl Record for Post {
        type Id = String;

        fn id(&self) -> Option<String> {
            Some(self.slug.clone()).filter(|s| !s.is_empty())
        }
    }

    impl StoredRecord for Post {
        fn from_params(_seq: u64, params: &Params) -> Result<Self, ValidationErrors> {
            let mut post = Post::default();
            post.apply(params)?;
            Ok(post)
        }

        fn apply(&mut self, params: &Params) -> Result<(), ValidationErrors> {
            if let Some(slug) = params.get("slug").and_then(Value::as_str) {
                self.slug = slug.to_string();
            }
            if let Some(title) = params.get("title").and_then(Value::as_str) {
                self.title = title.to_string();
            }
            Ok(())
        }
    }

    fn post_params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn compares_mixed_values() {
        assert_eq!(compare_values(&json!(1), &json!(2)), Ordering::Less);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&Value::Null, &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2.5)), Ordering::Equal);
        assert_eq!(compare_values(&json!(-3), &json!(2.5)), Ordering::Less);
    }

    #[test]
    fn compares_large_integers_exactly() {
        // both round to the same f64
        let (a, b) = (json!(9_007_199_254_740_993u64), json!(9_007_199_254_740_992u64));
        assert_eq!(compare_values(&a, &b), Ordering::Greater);
        assert_eq!(compare_values(&json!(u64::MAX - 1), &json!(u64::MAX)), Ordering::Less);
        assert_eq!(compare_values(&json!(u64::MAX), &json!(-1)), Ordering::Greater);
        assert_eq!(compare_values(&json!(i64::MIN), &json!(i64::MIN + 1)), Ordering::Less);
    }

    #[tokio::test]
    async fn test_create_rejects_a_taken_id() {
        let (store, _) = MemoryStore::<Post>::spawn(8);

        // First post claims the slug
        let first = store
            .create(post_params(json!({ "slug": "hello", "title": "first" })))
            .await
            .expect("Failed to create post");
        assert_eq!(first.id(), Some("hello".to_string()));

        // Second post with the same slug is refused
        let second = store
            .create(post_params(json!({ "slug": "hello", "title": "second" })))
            .await;
        match second {
            Err(StoreError::Invalid(errors)) => {
                assert_eq!(errors.get("id"), ["has already been taken".to_string()]);
            }
            other => panic!("expected a taken id, got {other:?}"),
        }

        // Verify the original survives and is listed once
        let all = store.all(&ListQuery::default()).await.expect("Failed to list posts");
        assert_eq!(all, vec![first]);
    }

    #[tokio::test]
    async fn test_update_cannot_change_the_id() {
        let (store, _) = MemoryStore::<Post>::spawn(8);
        let post = store
            .create(post_params(json!({ "slug": "hello", "title": "first" })))
            .await
            .expect("Failed to create post");

        // Renaming the slug is refused
        let renamed = store
            .update(&post, post_params(json!({ "slug": "bye", "title": "second" })))
            .await;
        assert!(matches!(renamed, Err(StoreError::Invalid(ref e)) if !e.get("id").is_empty()));

        // Verify nothing moved
        let kept = store
            .find_by_id(&"hello".to_string())
            .await
            .expect("Failed to find post");
        assert_eq!(kept, Some(post.clone()));
        assert_eq!(store.find_by_id(&"bye".to_string()).await.unwrap(), None);

        // Other attributes still update
        let retitled = store
            .update(&post, post_params(json!({ "title": "second" })))
            .await
            .expect("Failed to update post");
        assert_eq!(retitled.title, "second");
        assert_eq!(store.all(&ListQuery::default()).await.unwrap().len(), 1);
    }
}
