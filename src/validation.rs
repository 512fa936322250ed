//! Field-level validation errors.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key used for errors that concern the record as a whole.
pub const BASE: &str = "base";

/// Field-level error details reported by the store.
///
/// Used both for validation failures on create/update and for constraint
/// violations on destroy; both render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Adds a record-level message.
    pub fn add_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Human-readable messages, e.g. `Ingredients can't be blank`.
    pub fn full_messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| {
                    if field == BASE {
                        m.clone()
                    } else {
                        format!("{} {}", humanize(field), m)
                    }
                })
            })
            .collect()
    }

    /// Converts into `Err(self)` when any error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_messages_humanize_fields() {
        let errors = ValidationErrors::new()
            .with("ingredients", "can't be blank")
            .with("grandma_id", "must exist");
        assert_eq!(
            errors.full_messages(),
            vec!["Grandma must exist", "Ingredients can't be blank"]
        );
    }

    #[test]
    fn base_messages_render_bare() {
        let mut errors = ValidationErrors::new();
        errors.add_base("can't be deleted because it contains real apple");
        assert_eq!(errors.to_string(), "can't be deleted because it contains real apple");
    }

    #[test]
    fn serializes_as_field_map() {
        let errors = ValidationErrors::new().with("name", "is too short");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "name": ["is too short"] })
        );
    }

    #[test]
    fn empty_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(ValidationErrors::new().with("a", "b").into_result().is_err());
    }
}
