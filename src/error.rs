//! # Pipeline Errors
//!
//! Error types shared across the pipeline. Three families are kept apart:
//!
//! - [`PipelineError`]: expected per-request failures. They are caught at the
//!   dispatcher boundary and turned into a response; they never escape it.
//! - [`StoreError`]: what a [`Collection`](crate::collection::Collection)
//!   reports. Converts into [`PipelineError`].
//! - [`ConfigurationError`]: setup-time failures. They stop a resource from
//!   being registered at all.

use crate::action::Action;
use crate::validation::ValidationErrors;

/// Expected failures of a single action request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The identifier did not resolve within the scoped collection.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The authorization gate denied the action.
    #[error("Forbidden: {0}")]
    Forbidden(Action),

    /// The store rejected a create or update.
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// The store refused to delete a record (e.g. dependent records exist).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(ValidationErrors),

    /// A create/update arrived without a payload.
    #[error("Missing parameter: {0}")]
    ParameterMissing(String),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A record could not be serialised into a response body.
    #[error("Render failed: {0}")]
    Render(String),
}

/// Errors reported by a store collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid record: {0}")]
    Invalid(ValidationErrors),
    #[error("Record is constrained: {0}")]
    Constrained(ValidationErrors),
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => PipelineError::NotFound(id),
            StoreError::Invalid(errors) => PipelineError::ValidationFailed(errors),
            StoreError::Constrained(errors) => PipelineError::ConstraintViolation(errors),
            other @ (StoreError::Closed | StoreError::Dropped) => {
                PipelineError::StoreUnavailable(other.to_string())
            }
        }
    }
}

/// Setup-time errors. A resource that fails configuration is never reachable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Resource `{0}` has no locator configured")]
    MissingLocator(String),
    #[error("Resource `{tag}` is invalid: {reason}")]
    InvalidResourceType { tag: String, reason: String },
    #[error("Resource `{0}` is already registered")]
    DuplicateResource(String),
    #[error("Resource `{0}` is not registered")]
    UnregisteredResource(String),
}

/// The request does not map onto any reachable action.
///
/// Returned both for unknown paths and for actions a resource type does not
/// enable, so the two cases cannot be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No route matches")]
pub struct NoRoute;
