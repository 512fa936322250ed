//! # Resource Locator
//!
//! Resolves the caller's scoped collection and finds single records in it.
//! The pipeline never builds an unscoped view of the store on its own; the
//! deployment supplies the scope through [`Locator::scoped_collection`].

use crate::collection::Collection;
use crate::error::PipelineError;
use crate::record::Record;
use async_trait::async_trait;
use std::sync::Arc;

/// Finds the records an action operates on.
///
/// `C` is the per-request context (current user, tenant, ...) injected by the
/// caller of the dispatcher.
#[async_trait]
pub trait Locator<R: Record, C: Send + Sync>: Send + Sync {
    /// The collection visible to the caller described by `ctx`.
    fn scoped_collection(&self, ctx: &C) -> Arc<dyn Collection<R>>;

    /// Finds a record by its path identifier.
    ///
    /// The default parses `id` into `R::Id` and delegates to
    /// [`Collection::find_by_id`]. Identifiers that do not parse are
    /// reported as not found. Override for slugs or other schemes.
    async fn find(&self, collection: &dyn Collection<R>, id: &str) -> Result<R, PipelineError> {
        let not_found = || PipelineError::NotFound(id.to_string());
        let parsed = id.parse::<R::Id>().map_err(|_| not_found())?;
        collection.find_by_id(&parsed).await?.ok_or_else(not_found)
    }
}

/// A locator over one fixed collection, ignoring the request context.
pub struct FixedLocator<R: Record> {
    collection: Arc<dyn Collection<R>>,
}

impl<R: Record> FixedLocator<R> {
    pub fn new(collection: Arc<dyn Collection<R>>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<R: Record, C: Send + Sync> Locator<R, C> for FixedLocator<R> {
    fn scoped_collection(&self, _ctx: &C) -> Arc<dyn Collection<R>> {
        self.collection.clone()
    }
}

#[async_trait]
impl<R, C, F> Locator<R, C> for F
where
    R: Record,
    C: Send + Sync,
    F: Fn(&C) -> Arc<dyn Collection<R>> + Send + Sync,
{
    fn scoped_collection(&self, ctx: &C) -> Arc<dyn Collection<R>> {
        self(ctx)
    }
}
