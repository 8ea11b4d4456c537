//! Reconciliation configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use plman_core::{ScanConfig, DEFAULT_EXCLUDED_EXTENSIONS};

/// Playlist metadata key holding the associated sync folder.
pub const DEFAULT_ROOT_KEY: &str = "Sync_Folder";

/// When to flag a playlist as modified after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifiedPolicy {
    /// After every completed operation, even if nothing changed.
    Always,
    /// Only when at least one entry or the folder association changed.
    #[default]
    OnChange,
}

/// Configuration for a [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ReconcileConfig {
    /// When to mark the playlist modified and ask the host to save it.
    #[builder(default)]
    pub modified_policy: ModifiedPolicy,

    /// Metadata key storing the sync folder.
    #[builder(default = "DEFAULT_ROOT_KEY.to_string()")]
    pub root_key: String,

    /// Extensions left out of folder scans.
    #[builder(default = "default_excluded_extensions()")]
    pub excluded_extensions: Vec<String>,

    /// Descend into symlinked directories while scanning.
    #[builder(default = "true")]
    pub follow_symlinks: bool,

    /// Maximum scan depth (None = unlimited).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Include hidden files when scanning.
    #[builder(default = "true")]
    pub include_hidden: bool,
}

fn default_excluded_extensions() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl ReconcileConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.root_key.as_ref().is_some_and(|k| k.is_empty()) {
            return Err("Root metadata key cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            modified_policy: ModifiedPolicy::default(),
            root_key: DEFAULT_ROOT_KEY.to_string(),
            excluded_extensions: default_excluded_extensions(),
            follow_symlinks: true,
            max_depth: None,
            include_hidden: true,
        }
    }
}

impl ReconcileConfig {
    /// Create a new config builder.
    pub fn builder() -> ReconcileConfigBuilder {
        ReconcileConfigBuilder::default()
    }

    /// Build the scan configuration for a sync folder.
    pub fn scan_config(&self, root: impl Into<PathBuf>) -> ScanConfig {
        ScanConfig {
            root: root.into(),
            excluded_extensions: self.excluded_extensions.clone(),
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
            include_hidden: self.include_hidden,
        }
    }
}
