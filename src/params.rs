//! # Params Filter
//!
//! Reduces a raw payload to the fields a resource lets callers write.
//!
//! Create and update have independent allow-lists, since a field such as a
//! parent identifier may be writable on create but fixed afterwards. A
//! missing or empty allow-list permits the whole payload: callers that need
//! protection must configure an explicit, non-empty list.

use crate::action::Action;
use crate::record::Params;
use std::collections::BTreeSet;

/// Field names permitted through filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Keeps only allow-listed keys of `payload`.
///
/// `None` or an empty list returns the payload unchanged. Keys outside a
/// non-empty list are dropped silently.
pub fn filter_params(payload: Params, allow: Option<&AllowList>) -> Params {
    match allow {
        Some(list) if !list.is_empty() => payload
            .into_iter()
            .filter(|(key, _)| list.contains(key))
            .collect(),
        _ => payload,
    }
}

/// Per-action allow-lists for payload-bearing actions.
#[derive(Debug, Clone, Default)]
pub struct ParamsFilter {
    create: Option<AllowList>,
    update: Option<AllowList>,
}

impl ParamsFilter {
    /// A filter that permits everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create = Some(AllowList::new(fields));
        self
    }

    pub fn update<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update = Some(AllowList::new(fields));
        self
    }

    /// The allow-list configured for `action`, if any.
    pub fn allow_list(&self, action: Action) -> Option<&AllowList> {
        match action {
            Action::Create => self.create.as_ref(),
            Action::Update => self.update.as_ref(),
            _ => None,
        }
    }

    /// Filters `payload` with the allow-list of `action`.
    pub fn filter(&self, action: Action, payload: Params) -> Params {
        filter_params(payload, self.allow_list(action))
    }
}
