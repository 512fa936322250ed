//! # Error Translator
//!
//! Maps expected failures to well-formed responses. [`rescue`] is the wrapper
//! placed around every action: whatever an action returns, the caller gets
//! exactly one [`ResponseOutcome`] in the requested format.
//!
//! | Failure | Status | Data form | Structured form |
//! |---|---|---|---|
//! | `NotFound` | 404 | empty | `Not Found` |
//! | `Forbidden` | 403 | empty | `Forbidden` |
//! | `ValidationFailed` / `ConstraintViolation` | 422 | `{ "errors": {...} }` | form view with full messages |
//! | `ParameterMissing` | 400 | empty | `Missing parameter: ...` |
//! | `StoreUnavailable` / `Render` | 500 | empty | `Internal Server Error` |

use crate::action::{Action, Format};
use crate::error::PipelineError;
use crate::render::RenderContext;
use crate::response::{Flash, ResponseOutcome};
use crate::validation::ValidationErrors;
use http::StatusCode;
use serde_json::json;
use tracing::{error, warn};

/// Converts pipeline failures into responses.
///
/// Override single methods to customise one failure kind, e.g. redirect on
/// [`forbidden`](Self::forbidden).
pub trait ErrorTranslator: Send + Sync {
    fn translate(&self, failure: &PipelineError, cx: &RenderContext<'_>) -> ResponseOutcome {
        match failure {
            PipelineError::NotFound(_) => self.not_found(cx),
            PipelineError::Forbidden(_) => self.forbidden(cx),
            PipelineError::ValidationFailed(errors) | PipelineError::ConstraintViolation(errors) => {
                self.unprocessable(errors, cx)
            }
            PipelineError::ParameterMissing(param) => self.bad_request(param, cx),
            PipelineError::StoreUnavailable(_) | PipelineError::Render(_) => {
                self.internal_error(cx)
            }
        }
    }

    fn not_found(&self, cx: &RenderContext<'_>) -> ResponseOutcome {
        plain(cx.format, StatusCode::NOT_FOUND, "Not Found")
    }

    fn forbidden(&self, cx: &RenderContext<'_>) -> ResponseOutcome {
        plain(cx.format, StatusCode::FORBIDDEN, "Forbidden")
    }

    fn unprocessable(&self, errors: &ValidationErrors, cx: &RenderContext<'_>) -> ResponseOutcome {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        match cx.format {
            Format::Json => ResponseOutcome::json(status, json!({ "errors": errors })),
            Format::Html => {
                let messages = errors.full_messages();
                let outcome = ResponseOutcome::view(
                    status,
                    cx.action.view_name(),
                    json!({ "errors": messages }),
                );
                // a failed form submission re-renders the form; only a failed
                // destroy leaves the page the user was on
                if cx.action == Action::Destroy {
                    outcome.with_flash(Flash::Error(messages.join(", ")))
                } else {
                    outcome
                }
            }
        }
    }

    fn bad_request(&self, param: &str, cx: &RenderContext<'_>) -> ResponseOutcome {
        plain(
            cx.format,
            StatusCode::BAD_REQUEST,
            &format!("Missing parameter: {param}"),
        )
    }

    fn internal_error(&self, cx: &RenderContext<'_>) -> ResponseOutcome {
        plain(
            cx.format,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
    }
}

fn plain(format: Format, status: StatusCode, text: &str) -> ResponseOutcome {
    match format {
        Format::Json => ResponseOutcome::head(status),
        Format::Html => ResponseOutcome::text(status, text),
    }
}

/// The standard translations listed in the module table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardErrors;

impl ErrorTranslator for StandardErrors {}

/// Runs the translation step around an action result.
pub fn rescue(
    translator: &dyn ErrorTranslator,
    cx: &RenderContext<'_>,
    result: Result<ResponseOutcome, PipelineError>,
) -> ResponseOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(failure) => {
            let resource = cx.resource_type.tag();
            match &failure {
                PipelineError::StoreUnavailable(_) | PipelineError::Render(_) => {
                    error!(resource, action = %cx.action, error = %failure, "Action failed")
                }
                _ => warn!(resource, action = %cx.action, error = %failure, "Action rejected"),
            }
            translator.translate(&failure, cx)
        }
    }
}
