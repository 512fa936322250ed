//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Configuration**: `Dispatcher built` and `Registered` per resource type
//! - **Dispatch**: one `dispatch{resource=.. action=..}` span per request
//! - **Outcomes**: `Listed`, `Created`, `Updated`, `Deleted`, `Denied`, and
//!   the rescued failure (`warn` for expected ones, `error` for 500s)
//! - **Memory store**: startup, every request at `debug`, shutdown size
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # request ids, payloads and formats
//! RUST_LOG=debug cargo run
//!
//! # only the dispatcher
//! RUST_LOG=resource_pipeline::dispatcher=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a create through the registry reads:
//!
//! ```text
//! INFO Registered resource=item record_type="Item"
//! INFO dispatch{resource="item" action=create}: Created id=Some("1") size=1
//! INFO dispatch{resource="item" action=create}: Created id=Some("1")
//! ```

/// Initializes the global subscriber.
///
/// Panics if a global subscriber is already set; call it once from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // resource/record_type fields identify the source
        .compact()
        .init();
}
