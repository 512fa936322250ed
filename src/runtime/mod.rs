//! Runtime setup shared by the demo binary and embedding applications.
//!
//! - [`setup_tracing`] initializes structured logging.

pub mod tracing;

pub use self::tracing::setup_tracing;
