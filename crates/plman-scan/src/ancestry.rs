//! Directory identity tracking for symlink loop detection.

use std::fs::Metadata;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Identity of a directory on disk: (inode, device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirKey {
    /// Inode number.
    pub inode: u64,
    /// Device ID.
    pub device: u64,
}

impl DirKey {
    /// Create a new directory key.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }

    /// Get the key of a directory from its metadata.
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        Some(Self::new(metadata.ino(), metadata.dev()))
    }

    /// Directory keys are unavailable on this platform.
    #[cfg(not(unix))]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Get the key of the directory at `path`, following symlinks.
    pub fn of_path(path: &Path) -> Option<Self> {
        std::fs::metadata(path)
            .ok()
            .and_then(|m| Self::from_metadata(&m))
    }
}

/// The directories between the scan root and a pending directory.
///
/// A directory whose key already appears among its own ancestors can only
/// have been reached through a symlink (or bind mount) that loops back, and
/// expanding it again would never terminate.
#[derive(Debug, Clone, Default)]
pub struct Ancestry {
    keys: Vec<DirKey>,
}

impl Ancestry {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a directory is already on this chain.
    pub fn contains(&self, key: &DirKey) -> bool {
        self.keys.contains(key)
    }

    /// Extend the chain with a child directory.
    ///
    /// A child without a key is recorded as nothing, so it can never be
    /// reported as a loop.
    pub fn child(&self, key: Option<DirKey>) -> Self {
        let mut keys = self.keys.clone();
        keys.extend(key);
        Self { keys }
    }

    /// Number of keyed directories on the chain.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
