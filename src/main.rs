//! # Resource Pipeline Demo
//!
//! Serves one `item` resource out of the in-memory store through a
//! [`Registry`], scoped to the signed-in owner, and walks it through the
//! canonical actions:
//!
//! 1. Create two items (data form and structured form).
//! 2. List them, sorted and paginated.
//! 3. A read-only session tries to delete one (403).
//! 4. Deleting an item still in stock is refused (422).
//! 5. Update it, then delete it (302 back to the index).
//! 6. An unknown resource yields no route.

use http::Method;
use resource_pipeline::memory::{MemoryStore, StoredRecord};
use resource_pipeline::runtime::setup_tracing;
use resource_pipeline::sorting::Paginated;
use resource_pipeline::validation::BASE;
use resource_pipeline::{
    Action, ActionDispatcher, Collection, HttpRequest, Params, ParamsFilter, Record, Registry,
    ResourceType, SortDirection, ValidationErrors,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// The caller of one request.
struct Session {
    user_id: u64,
    can_write: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Item {
    id: Option<u64>,
    owner_id: u64,
    name: String,
    quantity: u32,
}

impl Record for Item {
    type Id = u64;

    fn id(&self) -> Option<u64> {
        self.id
    }
}

impl StoredRecord for Item {
    fn from_params(id: u64, params: &Params) -> Result<Self, ValidationErrors> {
        let mut item = Item {
            id: Some(id),
            ..Item::default()
        };
        item.apply(params)?;
        Ok(item)
    }

    fn apply(&mut self, params: &Params) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(value) = params.get("owner_id") {
            match value.as_u64() {
                Some(owner_id) => self.owner_id = owner_id,
                None => errors.add("owner_id", "is not a number"),
            }
        }
        if let Some(value) = params.get("name") {
            match value.as_str() {
                Some(name) => self.name = name.to_string(),
                None => errors.add("name", "must be text"),
            }
        }
        if let Some(value) = params.get("quantity") {
            match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(quantity) => self.quantity = quantity,
                None => errors.add("quantity", "is not a number"),
            }
        }
        errors.into_result()
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        if self.name.trim().is_empty() {
            return Err(ValidationErrors::new().with("name", "can't be blank"));
        }
        Ok(())
    }

    fn before_destroy(&self) -> Result<(), ValidationErrors> {
        if self.quantity > 0 {
            return Err(ValidationErrors::new().with(BASE, "Cannot delete an item that is still in stock"));
        }
        Ok(())
    }
}

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

async fn send(registry: &Registry<Session>, session: &Session, request: HttpRequest) {
    let (method, path) = (request.method.clone(), request.path.clone());
    match registry.handle(session, request).await {
        Ok(outcome) => info!(
            %method,
            %path,
            status = %outcome.status,
            location = ?outcome.location,
            flash = ?outcome.flash,
            body = ?outcome.body,
            "Response"
        ),
        Err(e) => warn!(%method, %path, error = %e, "Unroutable"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!("Starting resource pipeline demo");

    let (store, handle) = MemoryStore::<Item>::spawn(32);

    let scoped_store = store.clone();
    let dispatcher = ActionDispatcher::<Item, Session>::builder(ResourceType::new(
        "item", "item", "items", "Item",
    ))
    .locator(move |session: &Session| -> Arc<dyn Collection<Item>> {
        Arc::new(scoped_store.scoped("owner_id", session.user_id))
    })
    .authorization(|session: &Session, action: Action, _item: Option<&Item>| {
        !action.is_mutating() || session.can_write
    })
    .permitted_params(
        ParamsFilter::new()
            .create(["name", "quantity"])
            .update(["name", "quantity"]),
    )
    .sorting(Paginated::new(10).sorted_by("name", SortDirection::Asc))
    .build()?;

    let mut registry = Registry::new();
    registry.register(dispatcher)?;

    let alice = Session {
        user_id: 1,
        can_write: true,
    };
    let alice_read_only = Session {
        user_id: 1,
        can_write: false,
    };

    async {
        send(
            &registry,
            &alice,
            HttpRequest::new(Method::POST, "/items.json")
                .with_payload(params(json!({ "name": "Lamp", "quantity": 0 }))),
        )
        .await;

        // owner_id is not permitted and is stamped by the scope anyway
        send(
            &registry,
            &alice,
            HttpRequest::new(Method::POST, "/items")
                .with_payload(params(json!({ "name": "Desk", "quantity": 3, "owner_id": 99 }))),
        )
        .await;
    }
    .instrument(tracing::info_span!("stocking"))
    .await;

    send(
        &registry,
        &alice,
        HttpRequest::new(Method::GET, "/items.json").with_query("page", "1"),
    )
    .await;

    async {
        send(&registry, &alice_read_only, HttpRequest::new(Method::DELETE, "/items/2")).await;
        send(&registry, &alice, HttpRequest::new(Method::DELETE, "/items/2")).await;
        send(
            &registry,
            &alice,
            HttpRequest::new(Method::PATCH, "/items/2.json")
                .with_payload(params(json!({ "quantity": 0 }))),
        )
        .await;
        send(&registry, &alice, HttpRequest::new(Method::DELETE, "/items/2")).await;
    }
    .instrument(tracing::info_span!("clearance"))
    .await;

    send(&registry, &alice, HttpRequest::new(Method::GET, "/widgets")).await;

    // the registry owns the last handle clones; dropping both stops the actor
    drop(registry);
    drop(store);
    handle.await?;

    info!("Demo completed successfully");
    Ok(())
}
