//! Breadth-first folder scanner.

use std::collections::VecDeque;
use std::fs::{self, ReadDir};
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use plman_core::{FileIdentity, ScanConfig, ScanError, ScanWarning, WarningKind};

use crate::ancestry::{Ancestry, DirKey};
use crate::snapshot::DirectorySnapshot;

const TARGET: &str = "plman::scan";

/// A directory waiting on the worklist.
struct PendingDir {
    path: PathBuf,
    depth: u32,
    ancestry: Ancestry,
}

/// Scanner that walks a folder with an explicit FIFO worklist.
///
/// Directories are listed in the order they were discovered. Within a
/// directory, entries are taken in the order the filesystem returns them,
/// so the resulting snapshot order is traversal order, not sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderScanner;

impl FolderScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan the configured root.
    ///
    /// Fails only if the root is empty or cannot be listed as a directory.
    /// Subdirectories that cannot be opened are skipped and reported in
    /// [`DirectorySnapshot::warnings`].
    pub fn scan(&self, config: &ScanConfig) -> Result<DirectorySnapshot, ScanError> {
        let start = Instant::now();

        if config.root.as_os_str().is_empty() {
            return Err(ScanError::EmptyRoot);
        }

        let root = config.root.clone();
        let listing = fs::read_dir(&root).map_err(|e| {
            warn!(target: TARGET, root = %root.display(), error = %e, "cannot open scan root");
            ScanError::io(&root, e)
        })?;

        let ancestry = if config.follow_symlinks {
            Ancestry::new().child(DirKey::of_path(&root))
        } else {
            Ancestry::new()
        };

        let mut snapshot = DirectorySnapshot::new(root.clone());
        let mut worklist = VecDeque::new();

        let root_dir = PendingDir {
            path: root,
            depth: 0,
            ancestry,
        };
        self.expand(config, &root_dir, listing, &mut worklist, &mut snapshot);

        while let Some(dir) = worklist.pop_front() {
            match fs::read_dir(&dir.path) {
                Ok(listing) => self.expand(config, &dir, listing, &mut worklist, &mut snapshot),
                Err(err) => {
                    // Deleted, unreadable or replaced by a file since it was queued.
                    debug!(target: TARGET, path = %dir.path.display(), error = %err, "skipping directory");
                    snapshot.stats.dirs_skipped += 1;
                    snapshot.warnings.push(ScanWarning::read_error(&dir.path, &err));
                }
            }
        }

        snapshot.scan_duration = start.elapsed();

        info!(
            target: TARGET,
            root = %snapshot.root().display(),
            files = snapshot.len(),
            excluded = snapshot.stats.files_excluded,
            dirs = snapshot.stats.dirs_scanned,
            warnings = snapshot.warnings.len(),
            "scan complete"
        );

        Ok(snapshot)
    }

    /// List one directory: queue subdirectories, record files.
    fn expand(
        &self,
        config: &ScanConfig,
        dir: &PendingDir,
        listing: ReadDir,
        worklist: &mut VecDeque<PendingDir>,
        snapshot: &mut DirectorySnapshot,
    ) {
        snapshot.stats.record_dir(dir.depth);

        for entry_result in listing {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    snapshot.warnings.push(ScanWarning::read_error(&dir.path, &err));
                    continue;
                }
            };

            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if config.should_skip_hidden(&name) {
                continue;
            }

            let path = dir.path.join(&file_name);

            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    snapshot.warnings.push(ScanWarning::new(
                        &path,
                        err.to_string(),
                        WarningKind::MetadataError,
                    ));
                    continue;
                }
            };

            let is_dir = if file_type.is_symlink() {
                // Broken links fall through as files.
                match fs::metadata(&path) {
                    Ok(target) if target.is_dir() => {
                        if !config.follow_symlinks {
                            continue;
                        }
                        true
                    }
                    _ => false,
                }
            } else {
                file_type.is_dir()
            };

            if is_dir {
                self.queue_dir(config, dir, path, worklist, snapshot);
            } else if config.is_excluded(&name) {
                snapshot.stats.files_excluded += 1;
            } else {
                match FileIdentity::from_path(&path) {
                    Some(identity) => {
                        snapshot.insert(identity);
                    }
                    None => snapshot.warnings.push(ScanWarning::new(
                        &path,
                        "Path is not valid UTF-8",
                        WarningKind::InvalidPath,
                    )),
                }
            }
        }
    }

    /// Push a subdirectory onto the worklist unless it is too deep or loops.
    fn queue_dir(
        &self,
        config: &ScanConfig,
        parent: &PendingDir,
        path: PathBuf,
        worklist: &mut VecDeque<PendingDir>,
        snapshot: &mut DirectorySnapshot,
    ) {
        let depth = parent.depth + 1;
        if config.max_depth.is_some_and(|max| depth > max) {
            snapshot.warnings.push(ScanWarning::new(
                &path,
                format!("Deeper than {} levels", depth - 1),
                WarningKind::DepthLimit,
            ));
            return;
        }

        let ancestry = if config.follow_symlinks {
            let key = DirKey::of_path(&path);
            if key.is_some_and(|k| parent.ancestry.contains(&k)) {
                debug!(target: TARGET, path = %path.display(), "symlink loop");
                snapshot.warnings.push(ScanWarning::symlink_loop(&path));
                return;
            }
            parent.ancestry.child(key)
        } else {
            Ancestry::new()
        };

        worklist.push_back(PendingDir {
            path,
            depth,
            ancestry,
        });
    }
}
