//! Records, payloads and query input.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Raw or filtered attribute payload of a create/update call.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Ambient query-string values (pagination, sorting, ...).
pub type Query = HashMap<String, String>;

/// A single record owned by the external store.
///
/// The pipeline only ever borrows records: it renders them, hands them to
/// the authorization gate and passes them back to the store for update and
/// delete.
pub trait Record: Serialize + Default + Clone + Debug + Send + Sync + 'static {
    /// The identifier type (e.g. `u64`, `Uuid`, a slug).
    type Id: Clone + Eq + Hash + Display + FromStr + Debug + Send + Sync;

    /// Returns the identifier, or `None` for a blank record that was never saved.
    fn id(&self) -> Option<Self::Id>;

    /// The identifier as used in paths.
    fn to_param(&self) -> Option<String> {
        self.id().map(|id| id.to_string())
    }
}

/// Last path segment of `T`'s type name, without generic arguments.
///
/// `app::model::Wrapper<app::model::Pie>` becomes `Wrapper`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pie;
    struct Wrapper<T>(T);

    #[test]
    fn short_type_name_drops_path_and_generics() {
        assert_eq!(short_type_name::<Pie>(), "Pie");
        assert_eq!(short_type_name::<Wrapper<Pie>>(), "Wrapper");
        assert_eq!(short_type_name::<Vec<Wrapper<Pie>>>(), "Vec");
        assert_eq!(short_type_name::<u64>(), "u64");
    }
}
