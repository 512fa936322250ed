//! # Canonical Actions
//!
//! The seven standard operations every resource endpoint can expose, the
//! [`ActionSet`] that decides which of them a resource type enables, and the
//! response [`Format`] a caller asks for.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One of the seven canonical REST actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Show,
    New,
    Create,
    Edit,
    Update,
    Destroy,
}

impl Action {
    /// All actions in canonical order.
    pub const ALL: [Action; 7] = [
        Action::List,
        Action::Show,
        Action::New,
        Action::Create,
        Action::Edit,
        Action::Update,
        Action::Destroy,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Show => "show",
            Self::New => "new",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }

    /// Name of the view rendered by the structured form.
    pub const fn view_name(&self) -> &'static str {
        match self {
            Self::List => "index",
            Self::Show | Self::Destroy => "show",
            Self::New | Self::Create => "new",
            Self::Edit | Self::Update => "edit",
        }
    }

    /// Whether the action writes to the store.
    pub const fn is_mutating(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Destroy)
    }

    const fn bit(&self) -> u8 {
        match self {
            Self::List => 1,
            Self::Show => 1 << 1,
            Self::New => 1 << 2,
            Self::Create => 1 << 3,
            Self::Edit => 1 << 4,
            Self::Update => 1 << 5,
            Self::Destroy => 1 << 6,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "index" is accepted as the conventional name of the list action
            "list" | "index" => Ok(Self::List),
            "show" => Ok(Self::Show),
            "new" => Ok(Self::New),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "update" => Ok(Self::Update),
            "destroy" => Ok(Self::Destroy),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// The fixed subset of actions a resource type exposes.
///
/// The set is evaluated once when the dispatcher is built; there is no way
/// to add or remove actions afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSet(u8);

impl ActionSet {
    /// All seven actions.
    pub const FULL: ActionSet = ActionSet(0b111_1111);

    /// create / show / update / destroy only.
    pub const CORE_FOUR: ActionSet = ActionSet(
        Action::Create.bit() | Action::Show.bit() | Action::Update.bit() | Action::Destroy.bit(),
    );

    pub const EMPTY: ActionSet = ActionSet(0);

    /// Only the listed actions.
    pub fn only(actions: &[Action]) -> Self {
        Self(actions.iter().fold(0, |bits, a| bits | a.bit()))
    }

    /// Every action except the listed ones.
    pub fn except(actions: &[Action]) -> Self {
        Self(Self::FULL.0 & !Self::only(actions).0)
    }

    pub const fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled actions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'de> Deserialize<'de> for ActionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Preset(String),
            List(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Preset(name) => match name.as_str() {
                "full" => Ok(Self::FULL),
                "core-four" => Ok(Self::CORE_FOUR),
                other => Err(de::Error::custom(format!("unknown action preset `{other}`"))),
            },
            Repr::List(names) => {
                let actions = names
                    .iter()
                    .map(|n| n.parse::<Action>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(de::Error::custom)?;
                Ok(Self::only(&actions))
            }
        }
    }
}

/// The response format family requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Structured/browsable form: named views and redirects.
    #[default]
    Html,
    /// Data-interchange form: JSON mappings and direct status codes.
    Json,
}

impl Format {
    /// Maps a path extension (`json`, `html`) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Self::Json),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_four_excludes_list_new_edit() {
        let set = ActionSet::CORE_FOUR;
        assert!(set.contains(Action::Create));
        assert!(set.contains(Action::Show));
        assert!(set.contains(Action::Update));
        assert!(set.contains(Action::Destroy));
        assert!(!set.contains(Action::List));
        assert!(!set.contains(Action::New));
        assert!(!set.contains(Action::Edit));
    }

    #[test]
    fn full_enables_everything_in_order() {
        let all: Vec<_> = ActionSet::FULL.iter().collect();
        assert_eq!(all, Action::ALL.to_vec());
    }

    #[test]
    fn only_and_except() {
        let set = ActionSet::only(&[Action::List, Action::Show]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Action::List, Action::Show]);

        let set = ActionSet::except(&[Action::Destroy]);
        assert!(!set.contains(Action::Destroy));
        assert!(set.contains(Action::Edit));
    }

    #[test]
    fn deserializes_presets_and_lists() {
        let full: ActionSet = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(full, ActionSet::FULL);

        let core: ActionSet = serde_json::from_str("\"core-four\"").unwrap();
        assert_eq!(core, ActionSet::CORE_FOUR);

        let list: ActionSet = serde_json::from_str("[\"index\", \"show\"]").unwrap();
        assert_eq!(list, ActionSet::only(&[Action::List, Action::Show]));

        assert!(serde_json::from_str::<ActionSet>("\"most\"").is_err());
        assert!(serde_json::from_str::<ActionSet>("[\"explode\"]").is_err());
    }

    #[test]
    fn parses_index_alias() {
        assert_eq!("index".parse::<Action>().unwrap(), Action::List);
        assert!("publish".parse::<Action>().is_err());
    }
}
