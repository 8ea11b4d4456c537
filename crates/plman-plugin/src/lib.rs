//! Plugin surface for playlist-manager.
//!
//! This crate is what a player host talks to. It describes the plugin
//! ([`PluginDescriptor`]), lists the menu actions it offers
//! ([`ActionTable`]) and runs them through a [`PluginManager`]:
//!
//! | Action | Internal name |
//! |---|---|
//! | Remove Duplicate Items | `Remove_Duplicate_Items` |
//! | Remove Vanished Items | `Remove_Vanished_Items` |
//! | Sync Playlist | `Sync_Playlist` |
//! | Select Folder | `Select_Folder` |
//! | Reset Folder Tag | `Remove_Folder_Tag` |
//!
//! Settings are read from `settings.toml` in the user's config directory.
//!
//! # Example
//!
//! ```rust
//! use plman_core::memory::MemoryHost;
//! use plman_plugin::{PluginManager, PluginSettings};
//!
//! let host = MemoryHost::with_playlist(["/m/a.mp3", "/m/a.mp3"]);
//! let mut manager = PluginManager::new(PluginSettings::default());
//! manager.start().unwrap();
//!
//! let report = manager.dispatch(&host, "Remove_Duplicate_Items").unwrap();
//! assert_eq!(report.removed, 1);
//! ```

mod actions;
mod config;
mod hooks;
mod manager;
mod types;

pub use actions::{ActionFlags, ActionTable, PluginAction};
pub use config::{PluginDescriptor, PluginSettings, SETTINGS_FILE};
pub use hooks::{Hook, HookListener};
pub use manager::PluginManager;
pub use types::{ActionKind, PluginError, PluginResult};
