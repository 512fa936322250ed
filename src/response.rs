//! The terminal artifact of one action request.

use http::StatusCode;
use serde_json::Value;

/// Response body, by format family.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    /// Minimal plain-text body (e.g. `Forbidden`).
    Text(String),
    /// Data-form mapping.
    Json(Value),
    /// Structured form: a named view and the values it renders.
    View { name: String, assigns: Value },
}

/// One-shot message shown on the next structured-form page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Notice(String),
    Error(String),
}

/// Status, body and optional redirect target of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseOutcome {
    pub status: StatusCode,
    pub body: Body,
    pub location: Option<String>,
    pub flash: Option<Flash>,
}

impl ResponseOutcome {
    pub fn new(status: StatusCode, body: Body) -> Self {
        Self {
            status,
            body,
            location: None,
            flash: None,
        }
    }

    pub fn head(status: StatusCode) -> Self {
        Self::new(status, Body::Empty)
    }

    pub fn json(status: StatusCode, value: Value) -> Self {
        Self::new(status, Body::Json(value))
    }

    pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
        Self::new(status, Body::Text(text.into()))
    }

    pub fn view(status: StatusCode, name: impl Into<String>, assigns: Value) -> Self {
        Self::new(
            status,
            Body::View {
                name: name.into(),
                assigns,
            },
        )
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::head(StatusCode::FOUND)
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection() && self.location.is_some()
    }

    /// The JSON body, if this is a data-form response.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The view name, if this is a structured-form page.
    pub fn view_name(&self) -> Option<&str> {
        match &self.body {
            Body::View { name, .. } => Some(name),
            _ => None,
        }
    }
}
