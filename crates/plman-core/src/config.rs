//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Extensions skipped by default when scanning a folder (cover art).
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Configuration for a folder scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root folder to scan.
    pub root: PathBuf,

    /// File extensions to leave out, including the leading dot.
    /// Matching is exact and case-sensitive.
    #[builder(default = "default_excluded_extensions()")]
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,

    /// Descend into directories reached through symbolic links.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,

    /// Maximum directory depth to descend into (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Include hidden files and directories (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

fn default_excluded_extensions() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(ref extensions) = self.excluded_extensions {
            if let Some(bad) = extensions.iter().find(|e| !e.starts_with('.')) {
                return Err(format!("Excluded extension must start with '.': {bad}"));
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with default options for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_extensions: default_excluded_extensions(),
            follow_symlinks: true,
            max_depth: None,
            include_hidden: true,
        }
    }

    /// Check if a file is excluded by its extension.
    ///
    /// Files without an extension are never excluded.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        final_extension(file_name)
            .is_some_and(|ext| self.excluded_extensions.iter().any(|e| e == ext))
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

/// Get the final extension of a file name, including the leading dot.
///
/// This is the substring starting at the last `.` in the name.
pub fn final_extension(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx..])
}
