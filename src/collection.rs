//! # Store Contract
//!
//! The [`Collection`] trait is everything the pipeline needs from the
//! persistent store. The store owns records, validation and concurrency
//! control; the pipeline only calls these methods, one at a time, in the
//! order a single action requires.

use crate::error::StoreError;
use crate::record::{Params, Record};
use async_trait::async_trait;

/// Sort direction of a collection read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordering applied to a collection read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub attribute: String,
    pub direction: SortDirection,
}

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub per_page: u32,
}

impl Page {
    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        self.number.saturating_sub(1) as usize * self.per_page as usize
    }
}

/// Parameters of a collection read. The default reads everything, unordered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub sort: Option<SortSpec>,
    pub page: Option<Page>,
}

/// A scoped view of the store for one record type.
///
/// Validation failures come back as [`StoreError::Invalid`], destroy-time
/// refusals as [`StoreError::Constrained`]; both carry field-level details.
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// Looks a record up by identifier within the scope.
    async fn find_by_id(&self, id: &R::Id) -> Result<Option<R>, StoreError>;

    /// Reads the records in scope, ordered and windowed per `query`.
    async fn all(&self, query: &ListQuery) -> Result<Vec<R>, StoreError>;

    /// Creates a record from already-filtered attributes.
    async fn create(&self, attrs: Params) -> Result<R, StoreError>;

    /// Applies already-filtered attributes to `record`.
    ///
    /// On failure the persisted record must be unchanged.
    async fn update(&self, record: &R, attrs: Params) -> Result<R, StoreError>;

    /// Deletes `record`; on failure the record must remain present.
    async fn delete(&self, record: &R) -> Result<(), StoreError>;
}
