//! The action table exposed to the host.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::PluginSettings;
use crate::types::ActionKind;

/// Where the host offers an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionFlags {
    /// Available when a single track is selected.
    #[serde(default)]
    pub single_track: bool,
    /// Available when several tracks are selected.
    #[serde(default)]
    pub multiple_tracks: bool,
    /// Listed in the host's main menu.
    #[serde(default)]
    pub add_menu: bool,
}

impl ActionFlags {
    /// Flags shared by every playlist manager action.
    pub const fn menu() -> Self {
        Self {
            single_track: true,
            multiple_tracks: true,
            add_menu: true,
        }
    }
}

/// One action as registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginAction {
    pub kind: ActionKind,
    pub name: &'static str,
    pub title: &'static str,
    pub flags: ActionFlags,
}

impl PluginAction {
    fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            name: kind.name(),
            title: kind.title(),
            flags: ActionFlags::menu(),
        }
    }
}

/// Actions keyed by internal name, in the order the host lists them.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    actions: IndexMap<&'static str, PluginAction>,
}

impl ActionTable {
    /// The full set of actions in menu order.
    pub fn standard() -> Self {
        ActionKind::ALL.into_iter().map(PluginAction::new).collect()
    }

    /// The standard actions minus those disabled in `settings`.
    pub fn from_settings(settings: &PluginSettings) -> Self {
        Self::standard()
            .into_iter()
            .filter(|action| !settings.is_disabled(action.name))
            .collect()
    }

    /// Look up an action by internal name.
    pub fn get(&self, name: &str) -> Option<&PluginAction> {
        self.actions.get(name)
    }

    /// Check if an action is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over actions in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginAction> {
        self.actions.values()
    }
}

impl FromIterator<PluginAction> for ActionTable {
    fn from_iter<I: IntoIterator<Item = PluginAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().map(|a| (a.name, a)).collect(),
        }
    }
}

impl IntoIterator for ActionTable {
    type Item = PluginAction;
    type IntoIter = indexmap::map::IntoValues<&'static str, PluginAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_values()
    }
}
