//! # StoredRecord Trait
//!
//! What a record type implements to live in a [`StoreActor`](super::StoreActor).
//! The store assigns identifiers and calls the hooks; the record owns its
//! validation rules.
//!
//! # Provided Methods (Hooks)
//! - [`StoredRecord::validate`] runs after every create and update.
//! - [`StoredRecord::before_destroy`] can refuse a delete.
//!
//! Both default to `Ok(())`.

use crate::record::{Params, Record};
use crate::validation::ValidationErrors;

pub trait StoredRecord: Record {
    /// Builds a new record from already-filtered params and the
    /// store-assigned sequence number.
    fn from_params(id: u64, params: &Params) -> Result<Self, ValidationErrors>;

    /// Applies already-filtered params to an existing record.
    ///
    /// Called on a copy; the stored record is only replaced when this and
    /// [`validate`](Self::validate) both succeed.
    fn apply(&mut self, params: &Params) -> Result<(), ValidationErrors>;

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Refuses deletion, e.g. while other records depend on this one.
    fn before_destroy(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}
