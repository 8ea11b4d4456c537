//! Core types for the plugin layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use plman_reconcile::ReconcileError;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur in the plugin layer.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No action is registered under this name.
    #[error("Unknown action: {name}")]
    UnknownAction { name: String },

    /// The action exists but is disabled in the settings.
    #[error("Action '{name}' is disabled")]
    ActionDisabled { name: String },

    /// The action was invoked before the plugin was started.
    #[error("Plugin is not started")]
    NotStarted,

    /// A reconciliation operation failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Invalid settings file.
    #[error("Invalid plugin configuration: {message}")]
    ConfigError { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The actions the plugin offers to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    RemoveDuplicates,
    RemoveVanished,
    Sync,
    SelectFolder,
    ResetFolder,
}

impl ActionKind {
    /// All actions, in menu order.
    pub const ALL: [ActionKind; 5] = [
        Self::RemoveDuplicates,
        Self::RemoveVanished,
        Self::Sync,
        Self::SelectFolder,
        Self::ResetFolder,
    ];

    /// Internal action name the host invokes the action by.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "Remove_Duplicate_Items",
            Self::RemoveVanished => "Remove_Vanished_Items",
            Self::Sync => "Sync_Playlist",
            Self::SelectFolder => "Select_Folder",
            Self::ResetFolder => "Remove_Folder_Tag",
        }
    }

    /// Menu path shown by the host.
    pub fn title(&self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "Playlist Manager/Remove Duplicate Items",
            Self::RemoveVanished => "Playlist Manager/Remove Vanished Items",
            Self::Sync => "Playlist Manager/Sync Playlist",
            Self::SelectFolder => "Playlist Manager/› Select Folder",
            Self::ResetFolder => "Playlist Manager/› Reset Folder Tag",
        }
    }

    /// Look up an action by its internal name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ActionKind::from_name("sync_playlist"), None);
    }

    #[test]
    fn test_titles_share_menu() {
        assert!(
            ActionKind::ALL
                .iter()
                .all(|k| k.title().starts_with("Playlist Manager/"))
        );
    }

    #[test]
    fn test_error_display() {
        let err = PluginError::UnknownAction {
            name: "Shuffle".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown action: Shuffle");

        let err = PluginError::from(ReconcileError::NoRootConfigured);
        assert_eq!(
            err.to_string(),
            "No sync folder is associated with the playlist"
        );
    }
}
