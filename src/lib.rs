//! # Resource Pipeline
//!
//! > **The seven canonical resource actions, written once.**
//!
//! This crate runs `list`, `show`, `new`, `create`, `edit`, `update` and
//! `destroy` for any record type through one fixed pipeline:
//!
//! ```text
//! locate -> authorize -> filter params -> mutate -> render -> rescue
//! ```
//!
//! A concrete resource only supplies hooks: where its records live, who may
//! do what, which fields a client may write. Everything else has a default.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Generics: The Power of `R`
//! You'll see `ActionDispatcher<R: Record, C>` everywhere. `R` is the record
//! type and `C` the per-request context (session, current user, parent
//! record). The action bodies are written **once** and serve every resource.
//!
//! ### Hooks instead of subclasses
//! Each customisation point is a small trait with default methods:
//! [`Locator`](locator::Locator), [`AuthorizationGate`](authorization::AuthorizationGate),
//! [`SortingPaginator`](sorting::SortingPaginator),
//! [`RedirectPaths`](render::RedirectPaths), [`Translator`](render::Translator)
//! and [`ErrorTranslator`](rescue::ErrorTranslator). Closures implement the
//! one-method traits directly.
//!
//! ### Halt, don't continue
//! Every step returns `Result<_, PipelineError>` and is chained with `?`. A
//! denied authorization therefore stops the action before any store write;
//! [`rescue`](rescue::rescue) turns the failure into exactly one response.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Configuration ([`resource_type`], [`action`])
//! - **Key items**: [`ResourceType`], [`Action`], [`ActionSet`], [`Format`].
//!
//! ### 2. The Pipeline ([`dispatcher`])
//! - **Role**: Runs one action for one resource type.
//! - **Key items**: [`ActionDispatcher`], [`DispatcherBuilder`], [`ActionRequest`].
//!
//! ### 3. The Hooks ([`locator`], [`authorization`], [`params`], [`sorting`], [`render`], [`rescue`])
//!
//! ### 4. Storage ([`collection`], [`memory`], [`mock`])
//! - **Role**: The async [`Collection`] seam, an actor-backed in-memory
//!   store, and a scripted mock for tests.
//!
//! ### 5. Routing ([`routes`], [`registry`])
//! - **Role**: The conventional verb/path table and a [`Registry`] serving
//!   every configured resource from one entry point.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod action;
pub mod authorization;
pub mod collection;
pub mod dispatcher;
pub mod error;
pub mod locator;
pub mod memory;
pub mod mock;
pub mod params;
pub mod record;
pub mod registry;
pub mod render;
pub mod rescue;
pub mod resource_type;
pub mod response;
pub mod routes;
pub mod runtime;
pub mod sorting;
pub mod validation;

pub use action::{Action, ActionSet, Format};
pub use authorization::{AllowAll, AuthorizationGate};
pub use collection::{Collection, ListQuery, Page, SortDirection, SortSpec};
pub use dispatcher::{ActionDispatcher, ActionRequest, DispatcherBuilder};
pub use error::{ConfigurationError, NoRoute, PipelineError, StoreError};
pub use locator::{FixedLocator, Locator};
pub use params::{AllowList, ParamsFilter};
pub use record::{Params, Query, Record};
pub use registry::{Endpoint, HttpRequest, Registry};
pub use resource_type::{Location, ResourceType};
pub use response::{Body, Flash, ResponseOutcome};
pub use validation::ValidationErrors;
