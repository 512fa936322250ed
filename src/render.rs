//! # Response Renderer
//!
//! Turns a successful action into a format-specific [`ResponseOutcome`].
//!
//! | Outcome | Structured form | Data form |
//! |---|---|---|
//! | collection | view `index`, 200 | `{ <plural>: [...] }`, 200 |
//! | single record | view named after the action, 200 | `{ <singular>: {...} }`, 200 |
//! | created | redirect (after-create path) + notice | `{ <singular>: {...} }`, 201 |
//! | updated | redirect (after-update path) + notice | `{ <singular>: {...} }`, 200 |
//! | destroyed | redirect (after-destroy path) + notice | empty, 204 |

use crate::action::{Action, Format};
use crate::error::PipelineError;
use crate::record::Record;
use crate::resource_type::{Location, ResourceType};
use crate::response::{Flash, ResponseOutcome};
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// What the renderer needs to know about the current request.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub resource_type: &'a ResourceType,
    pub action: Action,
    pub format: Format,
}

/// Redirect targets after successful structured-form mutations.
///
/// Each hook can be overridden on its own.
pub trait RedirectPaths<R: Record>: Send + Sync {
    /// Defaults to the show page of the new record.
    fn after_resource_created_path(&self, record: &R) -> Location {
        show_location(record)
    }

    /// Defaults to the show page of the updated record.
    fn after_resource_updated_path(&self, record: &R) -> Location {
        show_location(record)
    }

    /// Defaults to the index page.
    fn after_resource_destroyed_path(&self, _record: &R) -> Location {
        Location::Index
    }
}

fn show_location<R: Record>(record: &R) -> Location {
    record
        .to_param()
        .map(Location::Show)
        .unwrap_or(Location::Index)
}

/// Show/show/index redirects.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRedirects;

impl<R: Record> RedirectPaths<R> for DefaultRedirects {}

/// Produces human-readable messages, keyed by e.g. `flash.create.success`,
/// interpolating the resource display name.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, resource: &str) -> String;
}

/// Built-in English messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl Translator for EnglishMessages {
    fn translate(&self, key: &str, resource: &str) -> String {
        match key {
            "flash.create.success" => format!("{resource} was successfully created"),
            "flash.update.success" => format!("{resource} was successfully updated"),
            "flash.destroy.success" => format!("{resource} was successfully deleted"),
            other => other.to_string(),
        }
    }
}

impl<F> Translator for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn translate(&self, key: &str, resource: &str) -> String {
        self(key, resource)
    }
}

/// Renders successful outcomes.
pub struct ResponseRenderer<R: Record> {
    redirects: Arc<dyn RedirectPaths<R>>,
    translator: Arc<dyn Translator>,
}

impl<R: Record> ResponseRenderer<R> {
    pub fn new(redirects: Arc<dyn RedirectPaths<R>>, translator: Arc<dyn Translator>) -> Self {
        Self {
            redirects,
            translator,
        }
    }

    /// The success notice for `action`, e.g. `Item was successfully created`.
    pub fn success_message(&self, cx: &RenderContext<'_>) -> String {
        self.translator.translate(
            &format!("flash.{}.success", cx.action),
            cx.resource_type.display_name(),
        )
    }

    pub fn render_collection(
        &self,
        cx: &RenderContext<'_>,
        records: &[R],
    ) -> Result<ResponseOutcome, PipelineError> {
        let body = keyed(cx.resource_type.plural_name(), to_value(records)?);
        Ok(match cx.format {
            Format::Json => ResponseOutcome::json(StatusCode::OK, body),
            Format::Html => ResponseOutcome::view(StatusCode::OK, cx.action.view_name(), body),
        })
    }

    /// show / edit / new.
    pub fn render_single(
        &self,
        cx: &RenderContext<'_>,
        record: &R,
    ) -> Result<ResponseOutcome, PipelineError> {
        let body = keyed(cx.resource_type.singular_name(), to_value(record)?);
        Ok(match cx.format {
            Format::Json => ResponseOutcome::json(StatusCode::OK, body),
            Format::Html => ResponseOutcome::view(StatusCode::OK, cx.action.view_name(), body),
        })
    }

    pub fn render_created(
        &self,
        cx: &RenderContext<'_>,
        record: &R,
    ) -> Result<ResponseOutcome, PipelineError> {
        match cx.format {
            Format::Json => {
                let body = keyed(cx.resource_type.singular_name(), to_value(record)?);
                let mut outcome = ResponseOutcome::json(StatusCode::CREATED, body);
                outcome.location = record.to_param().map(|id| cx.resource_type.show_path(&id));
                Ok(outcome)
            }
            Format::Html => {
                let target = self.redirects.after_resource_created_path(record);
                Ok(self.redirect_with_notice(cx, &target))
            }
        }
    }

    pub fn render_updated(
        &self,
        cx: &RenderContext<'_>,
        record: &R,
    ) -> Result<ResponseOutcome, PipelineError> {
        match cx.format {
            Format::Json => {
                let body = keyed(cx.resource_type.singular_name(), to_value(record)?);
                Ok(ResponseOutcome::json(StatusCode::OK, body))
            }
            Format::Html => {
                let target = self.redirects.after_resource_updated_path(record);
                Ok(self.redirect_with_notice(cx, &target))
            }
        }
    }

    pub fn render_destroyed(&self, cx: &RenderContext<'_>, record: &R) -> ResponseOutcome {
        match cx.format {
            Format::Json => ResponseOutcome::head(StatusCode::NO_CONTENT),
            Format::Html => {
                let target = self.redirects.after_resource_destroyed_path(record);
                self.redirect_with_notice(cx, &target)
            }
        }
    }

    fn redirect_with_notice(&self, cx: &RenderContext<'_>, target: &Location) -> ResponseOutcome {
        ResponseOutcome::redirect(cx.resource_type.path_for(target))
            .with_flash(Flash::Notice(self.success_message(cx)))
    }
}

fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, PipelineError> {
    serde_json::to_value(value).map_err(|e| PipelineError::Render(e.to_string()))
}
