#![allow(dead_code)]

use resource_pipeline::memory::{MemoryStore, StoredRecord};
use resource_pipeline::validation::BASE;
use resource_pipeline::{
    ActionDispatcher, Collection, DispatcherBuilder, Params, ParamsFilter, Record, ResourceType,
    ValidationErrors,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Test record: a pie owned by a grandma.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MockApplePie {
    pub id: Option<u64>,
    pub grandma_id: u64,
    pub ingredients: String,
    pub locked: bool,
    pub secret: Option<String>,
}

impl Record for MockApplePie {
    type Id = u64;

    fn id(&self) -> Option<u64> {
        self.id
    }
}

impl StoredRecord for MockApplePie {
    fn from_params(id: u64, params: &Params) -> Result<Self, ValidationErrors> {
        let mut pie = MockApplePie {
            id: Some(id),
            ..MockApplePie::default()
        };
        pie.apply(params)?;
        Ok(pie)
    }

    fn apply(&mut self, params: &Params) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (key, value) in params {
            match key.as_str() {
                "grandma_id" => match value.as_u64() {
                    Some(id) => self.grandma_id = id,
                    None => errors.add(key.as_str(), "is not a number"),
                },
                "ingredients" => match value.as_str() {
                    Some(s) => self.ingredients = s.to_string(),
                    None => errors.add(key.as_str(), "must be text"),
                },
                "locked" => match value.as_bool() {
                    Some(b) => self.locked = b,
                    None => errors.add(key.as_str(), "must be true or false"),
                },
                "secret" => self.secret = value.as_str().map(str::to_string),
                _ => {}
            }
        }
        errors.into_result()
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        if self.ingredients.trim().is_empty() {
            return Err(ValidationErrors::new().with("ingredients", "can't be blank"));
        }
        Ok(())
    }

    fn before_destroy(&self) -> Result<(), ValidationErrors> {
        if self.locked {
            return Err(ValidationErrors::new().with(BASE, "Cannot delete a locked pie"));
        }
        Ok(())
    }
}

/// Per-request context: the signed-in grandma.
#[derive(Debug, Clone, Copy)]
pub struct Grandma {
    pub id: u64,
}

pub const ALICE: Grandma = Grandma { id: 1 };
pub const BOB: Grandma = Grandma { id: 2 };

pub fn pies() -> ResourceType {
    ResourceType::new(
        "mock_apple_pie",
        "mock_apple_pie",
        "mock_apple_pies",
        "Mock apple pie",
    )
}

pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// A dispatcher over `store`, scoped per grandma, permitting
/// `ingredients` and `locked`.
pub fn builder(store: &MemoryStore<MockApplePie>) -> DispatcherBuilder<MockApplePie, Grandma> {
    builder_for(pies(), store)
}

pub fn builder_for(
    resource_type: ResourceType,
    store: &MemoryStore<MockApplePie>,
) -> DispatcherBuilder<MockApplePie, Grandma> {
    let store = store.clone();
    ActionDispatcher::builder(resource_type)
        .locator(move |grandma: &Grandma| -> Arc<dyn Collection<MockApplePie>> {
            Arc::new(store.scoped("grandma_id", grandma.id))
        })
        .permitted_params(
            ParamsFilter::new()
                .create(["ingredients", "locked"])
                .update(["ingredients", "locked"]),
        )
}

/// Stores a pie for `grandma` directly, bypassing the pipeline.
pub async fn bake(store: &MemoryStore<MockApplePie>, grandma: &Grandma, attrs: Value) -> MockApplePie {
    store
        .scoped("grandma_id", grandma.id)
        .create(params(attrs))
        .await
        .expect("Failed to bake pie")
}

pub fn pie_json(pie: &MockApplePie) -> Value {
    json!({
        "id": pie.id,
        "grandma_id": pie.grandma_id,
        "ingredients": pie.ingredients,
        "locked": pie.locked,
        "secret": pie.secret,
    })
}
