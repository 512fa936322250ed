//! # Action Dispatcher
//!
//! The top-level entry point. One [`ActionDispatcher`] serves one
//! [`ResourceType`]; it runs every canonical action through the same steps:
//!
//! ```text
//! locate (member actions) -> authorize -> filter params (create/update) -> mutate -> render
//! ```
//!
//! Each step returns `Result<_, PipelineError>` and is chained with `?`, so a
//! denied authorization halts the action before any store write. The whole
//! action runs inside [`rescue`], which turns failures into responses.
//!
//! Member actions locate their record before authorizing so the gate can
//! inspect it. An unknown identifier is therefore always reported as not
//! found, whatever the gate would have said.
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = ActionDispatcher::<Item, Session>::builder(items)
//!     .locator(FixedLocator::new(collection))
//!     .permitted_params(ParamsFilter::new().create(["name"]))
//!     .authorization(|session: &Session, action: Action, item: Option<&Item>| {
//!         !action.is_mutating() || session.is_admin
//!     })
//!     .build()?;
//!
//! let outcome = dispatcher.dispatch(&session, ActionRequest::show("4")).await?;
//! ```

use crate::action::{Action, Format};
use crate::authorization::{AllowAll, AuthorizationGate};
use crate::collection::Collection;
use crate::error::{ConfigurationError, NoRoute, PipelineError};
use crate::locator::Locator;
use crate::params::ParamsFilter;
use crate::record::{short_type_name, Params, Query, Record};
use crate::render::{DefaultRedirects, EnglishMessages, RedirectPaths, RenderContext, ResponseRenderer, Translator};
use crate::rescue::{rescue, ErrorTranslator, StandardErrors};
use crate::resource_type::ResourceType;
use crate::response::ResponseOutcome;
use crate::sorting::{SortingPaginator, Unsorted};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// One incoming call: action, identifier, payload, format and query values.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: Action,
    pub id: Option<String>,
    pub payload: Option<Params>,
    pub format: Format,
    pub query: Query,
}

impl ActionRequest {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            id: None,
            payload: None,
            format: Format::default(),
            query: Query::new(),
        }
    }

    pub fn list() -> Self {
        Self::new(Action::List)
    }

    pub fn show(id: impl Into<String>) -> Self {
        Self::new(Action::Show).with_id(id)
    }

    pub fn new_form() -> Self {
        Self::new(Action::New)
    }

    pub fn create(payload: Params) -> Self {
        Self::new(Action::Create).with_payload(payload)
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self::new(Action::Edit).with_id(id)
    }

    pub fn update(id: impl Into<String>, payload: Params) -> Self {
        Self::new(Action::Update).with_id(id).with_payload(payload)
    }

    pub fn destroy(id: impl Into<String>) -> Self {
        Self::new(Action::Destroy).with_id(id)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_payload(mut self, payload: Params) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn json(self) -> Self {
        self.with_format(Format::Json)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// Runs the canonical actions for one resource type.
///
/// `C` is the per-request context handed to the locator and the gate.
pub struct ActionDispatcher<R: Record, C: Send + Sync> {
    resource_type: ResourceType,
    record_type: &'static str,
    locator: Arc<dyn Locator<R, C>>,
    gate: Arc<dyn AuthorizationGate<R, C>>,
    params: ParamsFilter,
    sorting: Arc<dyn SortingPaginator>,
    renderer: ResponseRenderer<R>,
    errors: Arc<dyn ErrorTranslator>,
}

impl<R: Record, C: Send + Sync> ActionDispatcher<R, C> {
    pub fn builder(resource_type: ResourceType) -> DispatcherBuilder<R, C> {
        DispatcherBuilder::new(resource_type)
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    /// Short name of the record type, e.g. `MockApplePie`.
    pub fn record_type(&self) -> &'static str {
        self.record_type
    }

    /// Handles one request and produces exactly one response.
    ///
    /// Actions the resource type does not enable return [`NoRoute`], the same
    /// error an unknown path produces.
    pub async fn dispatch(&self, ctx: &C, request: ActionRequest) -> Result<ResponseOutcome, NoRoute> {
        let ActionRequest {
            action,
            id,
            payload,
            format,
            query,
        } = request;

        if !self.resource_type.actions().contains(action) {
            debug!(resource = self.resource_type.tag(), %action, "Action not enabled");
            return Err(NoRoute);
        }

        let span = info_span!("dispatch", resource = self.resource_type.tag(), %action);
        async move {
            debug!(?id, ?payload, ?format, "Dispatching");
            let cx = RenderContext {
                resource_type: &self.resource_type,
                action,
                format,
            };
            let result = match action {
                Action::List => self.list(ctx, &cx, &query).await,
                Action::Show | Action::Edit => self.show(ctx, &cx, id.as_deref()).await,
                Action::New => self.new_record(ctx, &cx),
                Action::Create => self.create(ctx, &cx, payload).await,
                Action::Update => self.update(ctx, &cx, id.as_deref(), payload).await,
                Action::Destroy => self.destroy(ctx, &cx, id.as_deref()).await,
            };
            let outcome = rescue(self.errors.as_ref(), &cx, result);
            debug!(status = %outcome.status, "Responded");
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    async fn list(
        &self,
        ctx: &C,
        cx: &RenderContext<'_>,
        query: &Query,
    ) -> Result<ResponseOutcome, PipelineError> {
        self.authorize(ctx, Action::List, None)?;
        let collection = self.locator.scoped_collection(ctx);
        let records = collection.all(&self.sorting.list_query(query)).await?;
        info!(count = records.len(), "Listed");
        self.renderer.render_collection(cx, &records)
    }

    /// show and edit.
    async fn show(
        &self,
        ctx: &C,
        cx: &RenderContext<'_>,
        id: Option<&str>,
    ) -> Result<ResponseOutcome, PipelineError> {
        let collection = self.locator.scoped_collection(ctx);
        let record = self.locate(collection.as_ref(), id).await?;
        self.authorize(ctx, cx.action, Some(&record))?;
        info!(id = ?record.to_param(), "Rendered");
        self.renderer.render_single(cx, &record)
    }

    fn new_record(&self, ctx: &C, cx: &RenderContext<'_>) -> Result<ResponseOutcome, PipelineError> {
        self.authorize(ctx, Action::New, None)?;
        self.renderer.render_single(cx, &R::default())
    }

    async fn create(
        &self,
        ctx: &C,
        cx: &RenderContext<'_>,
        payload: Option<Params>,
    ) -> Result<ResponseOutcome, PipelineError> {
        self.authorize(ctx, Action::Create, None)?;
        let attrs = self.params.filter(Action::Create, self.require_payload(payload)?);
        let collection = self.locator.scoped_collection(ctx);
        let record = collection.create(attrs).await?;
        info!(id = ?record.to_param(), "Created");
        self.renderer.render_created(cx, &record)
    }

    async fn update(
        &self,
        ctx: &C,
        cx: &RenderContext<'_>,
        id: Option<&str>,
        payload: Option<Params>,
    ) -> Result<ResponseOutcome, PipelineError> {
        let collection = self.locator.scoped_collection(ctx);
        let record = self.locate(collection.as_ref(), id).await?;
        self.authorize(ctx, Action::Update, Some(&record))?;
        let attrs = self.params.filter(Action::Update, self.require_payload(payload)?);
        let updated = collection.update(&record, attrs).await?;
        info!(id = ?updated.to_param(), "Updated");
        self.renderer.render_updated(cx, &updated)
    }

    async fn destroy(
        &self,
        ctx: &C,
        cx: &RenderContext<'_>,
        id: Option<&str>,
    ) -> Result<ResponseOutcome, PipelineError> {
        let collection = self.locator.scoped_collection(ctx);
        let record = self.locate(collection.as_ref(), id).await?;
        self.authorize(ctx, Action::Destroy, Some(&record))?;
        collection.delete(&record).await?;
        info!(id = ?record.to_param(), "Deleted");
        Ok(self.renderer.render_destroyed(cx, &record))
    }

    fn authorize(&self, ctx: &C, action: Action, record: Option<&R>) -> Result<(), PipelineError> {
        if self.gate.authorized(ctx, action, record) {
            Ok(())
        } else {
            warn!(id = ?record.and_then(Record::to_param), "Denied");
            Err(PipelineError::Forbidden(action))
        }
    }

    async fn locate(
        &self,
        collection: &dyn Collection<R>,
        id: Option<&str>,
    ) -> Result<R, PipelineError> {
        let id = id.ok_or_else(|| PipelineError::NotFound(String::new()))?;
        self.locator.find(collection, id).await
    }

    fn require_payload(&self, payload: Option<Params>) -> Result<Params, PipelineError> {
        payload.filter(|p| !p.is_empty()).ok_or_else(|| {
            PipelineError::ParameterMissing(self.resource_type.singular_name().to_string())
        })
    }
}

/// Collects the hooks of one resource type and validates them once.
///
/// Only the locator is required; every other hook has a default.
pub struct DispatcherBuilder<R: Record, C: Send + Sync> {
    resource_type: ResourceType,
    locator: Option<Arc<dyn Locator<R, C>>>,
    gate: Arc<dyn AuthorizationGate<R, C>>,
    params: ParamsFilter,
    sorting: Arc<dyn SortingPaginator>,
    redirects: Arc<dyn RedirectPaths<R>>,
    translator: Arc<dyn Translator>,
    errors: Arc<dyn ErrorTranslator>,
}

impl<R: Record, C: Send + Sync> DispatcherBuilder<R, C> {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            locator: None,
            gate: Arc::new(AllowAll),
            params: ParamsFilter::new(),
            sorting: Arc::new(Unsorted),
            redirects: Arc::new(DefaultRedirects),
            translator: Arc::new(EnglishMessages),
            errors: Arc::new(StandardErrors),
        }
    }

    pub fn locator(mut self, locator: impl Locator<R, C> + 'static) -> Self {
        self.locator = Some(Arc::new(locator));
        self
    }

    pub fn authorization(mut self, gate: impl AuthorizationGate<R, C> + 'static) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    pub fn permitted_params(mut self, params: ParamsFilter) -> Self {
        self.params = params;
        self
    }

    pub fn sorting(mut self, sorting: impl SortingPaginator + 'static) -> Self {
        self.sorting = Arc::new(sorting);
        self
    }

    pub fn redirects(mut self, redirects: impl RedirectPaths<R> + 'static) -> Self {
        self.redirects = Arc::new(redirects);
        self
    }

    pub fn translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn errors(mut self, errors: impl ErrorTranslator + 'static) -> Self {
        self.errors = Arc::new(errors);
        self
    }

    pub fn build(self) -> Result<ActionDispatcher<R, C>, ConfigurationError> {
        self.resource_type.validate()?;
        let locator = self
            .locator
            .ok_or_else(|| ConfigurationError::MissingLocator(self.resource_type.tag().to_string()))?;

        let record_type = short_type_name::<R>();

        info!(
            resource = self.resource_type.tag(),
            record_type,
            actions = ?self.resource_type.actions(),
            "Dispatcher built"
        );

        Ok(ActionDispatcher {
            resource_type: self.resource_type,
            record_type,
            locator,
            gate: self.gate,
            params: self.params,
            sorting: self.sorting,
            renderer: ResponseRenderer::new(self.redirects, self.translator),
            errors: self.errors,
        })
    }
}
