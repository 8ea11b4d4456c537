//! playlist-manager - keep a player playlist in step with a folder.
//!
//! This crate re-exports the public API of the workspace crates:
//!
//! - file identities, the [`PlaylistHost`] contract and errors, re-exported
//!   at the top level, with the in-memory host under [`memory`]
//! - [`scan`]: the breadth-first [`FolderScanner`]
//! - [`reconcile`]: the [`Reconciler`] and its reports
//! - [`plugin`]: the action table and [`PluginManager`] a host plugs into
//!
//! ```rust
//! use playlist_manager::memory::MemoryHost;
//! use playlist_manager::Reconciler;
//!
//! let host = MemoryHost::with_playlist(["/m/a.mp3", "/m/b.mp3", "/m/a.mp3"]);
//! let report = Reconciler::new(&host).remove_duplicates();
//! assert_eq!(report.summary(), "Remove duplicates: kept 2, removed 1");
//! ```

pub use plman_plugin as plugin;
pub use plman_reconcile as reconcile;
pub use plman_scan as scan;

pub use plman_core::memory;
pub use plman_core::{FileIdentity, HostError, PlaylistHost, PlaylistLock, ScanConfig, ScanError};
pub use plman_plugin::{ActionKind, PluginDescriptor, PluginError, PluginManager, PluginSettings};
pub use plman_reconcile::{
    ModifiedPolicy, Operation, Outcome, ReconcileConfig, ReconcileError, ReconcileReport,
    Reconciler,
};
pub use plman_scan::{DirectorySnapshot, FolderScanner};
