//! # In-Memory Store
//!
//! A reference [`Collection`](crate::collection::Collection) backed by an
//! actor: one [`StoreActor`] task owns the records of a type and answers
//! requests from any number of [`MemoryStore`] handles over a tokio channel.
//! It implements the full store contract (validation on create/update,
//! delete refusal, ordering, paging, scoping) and backs the demo binary and
//! the integration tests.
//!
//! ```rust,ignore
//! let (store, handle) = MemoryStore::<Pie>::spawn(32);
//! let grandmas_pies = store.scoped("grandma_id", 1);
//! let pie = grandmas_pies.create(params).await?;   // grandma_id = 1 stamped on
//! drop(grandmas_pies);
//! drop(store);
//! handle.await?;
//! ```

pub mod actor;
pub mod client;
pub mod entity;
pub mod message;

pub use actor::StoreActor;
pub use client::{MemoryStore, ScopedCollection};
pub use entity::StoredRecord;
pub use message::{Scope, StoreRequest};
