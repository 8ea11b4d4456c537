//! Plugin settings and descriptor.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use plman_reconcile::ReconcileConfig;

use crate::types::{PluginError, PluginResult};

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// User settings, read from `settings.toml`.
///
/// ```toml
/// disabled_actions = ["Remove_Folder_Tag"]
///
/// [reconcile]
/// modified_policy = "always"
/// excluded_extensions = [".jpg", ".jpeg", ".png", ".cue"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Internal names of actions hidden from the host.
    pub disabled_actions: HashSet<String>,

    /// Options passed to every reconciliation.
    pub reconcile: ReconcileConfig,
}

impl PluginSettings {
    /// Directory holding the settings file.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("playlist-manager")
    }

    /// Default location of the settings file.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join(SETTINGS_FILE)
    }

    /// Load settings from the default location.
    pub fn load_default() -> PluginResult<Self> {
        Self::load(&Self::default_path())
    }

    /// Load settings from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> PluginResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> PluginResult<Self> {
        toml::from_str(content).map_err(|e| PluginError::ConfigError {
            message: e.to_string(),
        })
    }

    /// Write settings to a file, creating its directory if needed.
    pub fn save(&self, path: &Path) -> PluginResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| PluginError::ConfigError {
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Disable an action by its internal name.
    pub fn disable_action(mut self, name: impl Into<String>) -> Self {
        self.disabled_actions.insert(name.into());
        self
    }

    /// Check if an action is disabled.
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled_actions.contains(name)
    }
}

/// Static information the host shows about the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin identifier (unique within the host).
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Plugin version.
    pub version: String,
    /// Project homepage.
    pub website: String,
    /// Copyright and license notice.
    pub copyright: String,
}

impl Default for PluginDescriptor {
    fn default() -> Self {
        Self {
            id: "playlist_manager".to_string(),
            name: "Playlist Manager".to_string(),
            description: "Sync the current playlist with a selected folder or remove \
                          duplicate and vanished files within the current playlist"
                .to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website: "https://github.com/kpcee/deadbeef-playlist-manager".to_string(),
            copyright: "Playlist Manager plugin\n\n\
                        This program is free software; you can redistribute it and/or \
                        modify it under the terms of the GNU General Public License \
                        as published by the Free Software Foundation; either version 2 \
                        of the License, or (at your option) any later version."
                .to_string(),
        }
    }
}
