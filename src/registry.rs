//! # Registry
//!
//! Holds the dispatchers of every configured resource type behind the
//! type-erased [`Endpoint`] trait, so one entry point can serve records of
//! different Rust types. Resources that failed configuration were never
//! built and therefore can never be registered or reached.

use crate::action::Format;
use crate::dispatcher::{ActionDispatcher, ActionRequest};
use crate::error::{ConfigurationError, NoRoute};
use crate::record::{Params, Query, Record};
use crate::resource_type::ResourceType;
use crate::response::ResponseOutcome;
use crate::routes::recognize;
use async_trait::async_trait;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A dispatcher with its record type erased.
#[async_trait]
pub trait Endpoint<C>: Send + Sync {
    fn resource_type(&self) -> &ResourceType;

    async fn call(&self, ctx: &C, request: ActionRequest) -> Result<ResponseOutcome, NoRoute>;
}

#[async_trait]
impl<R: Record, C: Send + Sync> Endpoint<C> for ActionDispatcher<R, C> {
    fn resource_type(&self) -> &ResourceType {
        ActionDispatcher::resource_type(self)
    }

    async fn call(&self, ctx: &C, request: ActionRequest) -> Result<ResponseOutcome, NoRoute> {
        self.dispatch(ctx, request).await
    }
}

/// An HTTP-shaped request as handed over by the deployment's router.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub format: Format,
    pub payload: Option<Params>,
    pub query: Query,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            format: Format::default(),
            payload: None,
            query: Query::new(),
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_payload(mut self, payload: Params) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// All registered resource endpoints, keyed by tag and by plural name.
pub struct Registry<C> {
    by_tag: HashMap<String, Arc<dyn Endpoint<C>>>,
    by_plural: HashMap<String, Arc<dyn Endpoint<C>>>,
}

impl<C: Send + Sync + 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + Sync + 'static> Registry<C> {
    pub fn new() -> Self {
        Self {
            by_tag: HashMap::new(),
            by_plural: HashMap::new(),
        }
    }

    /// Adds a built dispatcher. Tags and plural names must be unique.
    pub fn register<R: Record>(
        &mut self,
        dispatcher: ActionDispatcher<R, C>,
    ) -> Result<(), ConfigurationError> {
        let tag = dispatcher.resource_type().tag().to_string();
        let plural = dispatcher.resource_type().plural_name().to_string();

        if self.by_tag.contains_key(&tag) {
            return Err(ConfigurationError::DuplicateResource(tag));
        }
        if self.by_plural.contains_key(&plural) {
            return Err(ConfigurationError::DuplicateResource(plural));
        }

        info!(resource = %tag, record_type = dispatcher.record_type(), "Registered");
        let endpoint: Arc<dyn Endpoint<C>> = Arc::new(dispatcher);
        self.by_tag.insert(tag, endpoint.clone());
        self.by_plural.insert(plural, endpoint);
        Ok(())
    }

    /// The endpoint registered under `tag`.
    pub fn endpoint(&self, tag: &str) -> Result<Arc<dyn Endpoint<C>>, ConfigurationError> {
        self.by_tag
            .get(tag)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnregisteredResource(tag.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.by_tag.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Routes `request` to its resource and dispatches it.
    ///
    /// Unknown paths, unknown resources and disabled actions all yield
    /// [`NoRoute`].
    pub async fn handle(&self, ctx: &C, request: HttpRequest) -> Result<ResponseOutcome, NoRoute> {
        let route = recognize(&request.method, &request.path).ok_or(NoRoute)?;
        let endpoint = self.by_plural.get(&route.plural).ok_or_else(|| {
            debug!(path = %request.path, "Unknown resource");
            NoRoute
        })?;

        let mut action_request = ActionRequest::new(route.action)
            .with_format(route.format.unwrap_or(request.format));
        action_request.id = route.id;
        action_request.payload = request.payload;
        action_request.query = request.query;

        endpoint.call(ctx, action_request).await
    }
}
