//! Scan results.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use plman_core::{FileIdentity, ScanWarning};

/// Summary statistics for one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Directories listed, including the root.
    pub dirs_scanned: u64,
    /// Directories that could not be opened.
    pub dirs_skipped: u64,
    /// Distinct files included in the snapshot.
    pub files_included: u64,
    /// Files left out by extension.
    pub files_excluded: u64,
    /// Deepest directory level listed (root = 0).
    pub max_depth: u32,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a listed directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.dirs_scanned += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// The files found beneath a folder at one point in time.
///
/// Each identity appears once. Iteration follows the order in which the scan
/// found the files.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    root: PathBuf,
    files: IndexSet<FileIdentity>,
    /// Scan statistics.
    pub stats: ScanStats,
    /// Non-fatal problems met during the scan.
    pub warnings: Vec<ScanWarning>,
    /// Time the scan took.
    pub scan_duration: Duration,
}

impl DirectorySnapshot {
    /// Create an empty snapshot for a root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: IndexSet::new(),
            stats: ScanStats::new(),
            warnings: Vec::new(),
            scan_duration: Duration::ZERO,
        }
    }

    /// Build a snapshot from a list of identities, in the given order.
    pub fn from_files<I>(root: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FileIdentity>,
    {
        let mut snapshot = Self::new(root);
        for file in files {
            snapshot.insert(file.into());
        }
        snapshot
    }

    /// Add a file. Returns `false` if it was already present.
    pub(crate) fn insert(&mut self, identity: FileIdentity) -> bool {
        let inserted = self.files.insert(identity);
        if inserted {
            self.stats.files_included += 1;
        }
        inserted
    }

    /// Get the scanned root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files in the snapshot.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no files were found.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if a file is part of the snapshot.
    pub fn contains(&self, identity: &FileIdentity) -> bool {
        self.files.contains(identity)
    }

    /// Get the position of a file in scan order.
    pub fn index_of(&self, identity: &FileIdentity) -> Option<usize> {
        self.files.get_index_of(identity)
    }

    /// Get the file at a position in scan order.
    pub fn get(&self, index: usize) -> Option<&FileIdentity> {
        self.files.get_index(index)
    }

    /// Iterate over files in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &FileIdentity> {
        self.files.iter()
    }

    /// Check if any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl<'a> IntoIterator for &'a DirectorySnapshot {
    type Item = &'a FileIdentity;
    type IntoIter = indexmap::set::Iter<'a, FileIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
