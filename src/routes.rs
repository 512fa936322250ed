//! Conventional HTTP surface of a resource.
//!
//! | Action | Verb | Path |
//! |---|---|---|
//! | list | GET | `/<plural>` |
//! | new | GET | `/<plural>/new` |
//! | create | POST | `/<plural>` |
//! | show | GET | `/<plural>/:id` |
//! | edit | GET | `/<plural>/:id/edit` |
//! | update | PUT/PATCH | `/<plural>/:id` |
//! | destroy | DELETE | `/<plural>/:id` |
//!
//! A trailing `.json` or `.html` on the last segment selects the format.

use crate::action::{Action, Format};
use crate::resource_type::ResourceType;
use http::Method;

/// Verb and path pattern of `action` for `resource_type`.
pub fn route_for(resource_type: &ResourceType, action: Action) -> (Method, String) {
    let base = resource_type.index_path();
    match action {
        Action::List => (Method::GET, base),
        Action::New => (Method::GET, format!("{base}/new")),
        Action::Create => (Method::POST, base),
        Action::Show => (Method::GET, format!("{base}/:id")),
        Action::Edit => (Method::GET, format!("{base}/:id/edit")),
        Action::Update => (Method::PUT, format!("{base}/:id")),
        Action::Destroy => (Method::DELETE, format!("{base}/:id")),
    }
}

/// The routes of every enabled action, in canonical order.
pub fn routes(resource_type: &ResourceType) -> Vec<(Method, String, Action)> {
    resource_type
        .actions()
        .iter()
        .map(|action| {
            let (method, path) = route_for(resource_type, action);
            (method, path, action)
        })
        .collect()
}

/// A request path resolved to a resource and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedRoute {
    pub plural: String,
    pub action: Action,
    pub id: Option<String>,
    pub format: Option<Format>,
}

/// Resolves `method` + `path` against the conventional table.
///
/// Returns `None` for paths that cannot name any action. Whether the named
/// resource exists and enables the action is decided by the registry.
pub fn recognize(method: &Method, path: &str) -> Option<RecognizedRoute> {
    let path = path.split('?').next().unwrap_or_default();
    let mut segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    let mut format = None;
    let last = segments.len() - 1;
    let tail: &str = segments[last];
    if let Some((stem, ext)) = tail.rsplit_once('.') {
        if let Some(f) = Format::from_extension(ext) {
            if stem.is_empty() {
                return None;
            }
            format = Some(f);
            segments[last] = stem;
        }
    }

    let (plural, action, id) = match (segments.as_slice(), method) {
        ([plural], m) if m == Method::GET => (*plural, Action::List, None),
        ([plural], m) if m == Method::POST => (*plural, Action::Create, None),
        ([plural, "new"], m) if m == Method::GET => (*plural, Action::New, None),
        ([plural, id], m) if m == Method::GET => (*plural, Action::Show, Some(*id)),
        ([plural, id], m) if m == Method::PUT || m == Method::PATCH => {
            (*plural, Action::Update, Some(*id))
        }
        ([plural, id], m) if m == Method::DELETE => (*plural, Action::Destroy, Some(*id)),
        ([plural, id, "edit"], m) if m == Method::GET => (*plural, Action::Edit, Some(*id)),
        _ => return None,
    };

    Some(RecognizedRoute {
        plural: plural.to_string(),
        action,
        id: id.map(str::to_string),
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionSet;

    fn hit(method: Method, path: &str) -> Option<(Action, Option<String>, Option<Format>)> {
        recognize(&method, path).map(|r| (r.action, r.id, r.format))
    }

    #[test]
    fn recognizes_the_conventional_table() {
        assert_eq!(hit(Method::GET, "/items"), Some((Action::List, None, None)));
        assert_eq!(hit(Method::GET, "/items/new"), Some((Action::New, None, None)));
        assert_eq!(hit(Method::POST, "/items"), Some((Action::Create, None, None)));
        assert_eq!(hit(Method::GET, "/items/4"), Some((Action::Show, Some("4".into()), None)));
        assert_eq!(hit(Method::GET, "/items/4/edit"), Some((Action::Edit, Some("4".into()), None)));
        assert_eq!(hit(Method::PUT, "/items/4"), Some((Action::Update, Some("4".into()), None)));
        assert_eq!(hit(Method::PATCH, "/items/4"), Some((Action::Update, Some("4".into()), None)));
        assert_eq!(hit(Method::DELETE, "/items/4"), Some((Action::Destroy, Some("4".into()), None)));
    }

    #[test]
    fn extension_selects_format() {
        assert_eq!(
            hit(Method::GET, "/items/4.json"),
            Some((Action::Show, Some("4".into()), Some(Format::Json)))
        );
        assert_eq!(hit(Method::GET, "/items.json"), Some((Action::List, None, Some(Format::Json))));
        // unknown extensions stay part of the identifier
        assert_eq!(
            hit(Method::GET, "/items/v1.2"),
            Some((Action::Show, Some("v1.2".into()), None))
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(hit(Method::GET, "/"), None);
        assert_eq!(hit(Method::DELETE, "/items"), None);
        assert_eq!(hit(Method::GET, "/items/4/publish"), None);
        assert_eq!(hit(Method::GET, "/items//edit"), None);
    }

    #[test]
    fn routes_follow_enabled_actions() {
        let rt = ResourceType::new("item", "item", "items", "Item").with_actions(ActionSet::CORE_FOUR);
        let table = routes(&rt);
        let actions: Vec<_> = table.iter().map(|(_, _, a)| *a).collect();
        assert_eq!(actions, vec![Action::Show, Action::Create, Action::Update, Action::Destroy]);
        assert_eq!(route_for(&rt, Action::Edit), (Method::GET, "/items/:id/edit".to_string()));
    }
}
