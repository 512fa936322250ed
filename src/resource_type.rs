//! # Resource Types
//!
//! A [`ResourceType`] is the immutable configuration unit of one endpoint
//! group: the tag, the explicit display names, and the enabled actions.
//! Names are supplied, never inflected, so `person`/`people` needs no
//! pluralisation rules.

use crate::action::ActionSet;
use crate::error::ConfigurationError;
use serde::Deserialize;

/// Immutable configuration for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceType {
    tag: String,
    singular_name: String,
    plural_name: String,
    display_name: String,
    #[serde(default)]
    actions: ActionSet,
}

impl ResourceType {
    /// Creates a resource type with all seven actions enabled.
    pub fn new(
        tag: impl Into<String>,
        singular_name: impl Into<String>,
        plural_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            singular_name: singular_name.into(),
            plural_name: plural_name.into(),
            display_name: display_name.into(),
            actions: ActionSet::FULL,
        }
    }

    /// Restricts the enabled actions.
    pub fn with_actions(mut self, actions: ActionSet) -> Self {
        self.actions = actions;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Key of single-record JSON bodies, e.g. `mock_apple_pie`.
    pub fn singular_name(&self) -> &str {
        &self.singular_name
    }

    /// Key of collection JSON bodies and first path segment, e.g. `mock_apple_pies`.
    pub fn plural_name(&self) -> &str {
        &self.plural_name
    }

    /// Human-readable name used in messages, e.g. `Mock apple pie`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn actions(&self) -> ActionSet {
        self.actions
    }

    /// Checks the configuration; called once when a dispatcher is built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidResourceType {
            tag: self.tag.clone(),
            reason: reason.to_string(),
        };

        if self.tag.trim().is_empty() {
            return Err(invalid("tag is empty"));
        }
        if self.singular_name.trim().is_empty() || self.plural_name.trim().is_empty() {
            return Err(invalid("singular and plural names are required"));
        }
        if !is_path_segment(&self.plural_name) {
            return Err(invalid("plural name must be a single path segment"));
        }
        if self.actions.is_empty() {
            return Err(invalid("no actions enabled"));
        }
        Ok(())
    }

    /// `/<plural>`
    pub fn index_path(&self) -> String {
        format!("/{}", self.plural_name)
    }

    /// `/<plural>/<id>`
    pub fn show_path(&self, id: &str) -> String {
        format!("/{}/{}", self.plural_name, id)
    }

    /// Resolves a redirect target into a path.
    pub fn path_for(&self, location: &Location) -> String {
        match location {
            Location::Index => self.index_path(),
            Location::Show(id) => self.show_path(id),
            Location::Path(path) => path.clone(),
        }
    }
}

fn is_path_segment(s: &str) -> bool {
    !s.contains('/') && !s.contains('.') && !s.chars().any(char::is_whitespace)
}

/// Where a structured-form mutation redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The collection page.
    Index,
    /// The show page of the record with this identifier.
    Show(String),
    /// An arbitrary path.
    Path(String),
}
