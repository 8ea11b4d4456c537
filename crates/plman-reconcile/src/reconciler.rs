//! Reconciliation passes over a host playlist.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use plman_core::{FileIdentity, PlaylistHost, PlaylistLock};
use plman_scan::{DirectorySnapshot, FolderScanner};

use crate::config::{ModifiedPolicy, ReconcileConfig};
use crate::error::ReconcileError;
use crate::report::{EntryMutationFailure, MutationKind, Operation, ReconcileReport, ScanSummary};
use crate::working_set::WorkingSet;

const TARGET: &str = "plman::reconcile";

/// Runs reconciliation operations against a [`PlaylistHost`].
///
/// The reconciler borrows the host for its lifetime and holds no playlist
/// state between calls. Each operation:
///
/// 1. resolves the playlist (the host's current one unless given)
/// 2. does any filesystem work before taking the host lock
/// 3. reads and mutates entries under a single [`PlaylistLock`]
/// 4. after unlocking, flags the playlist modified per
///    [`ModifiedPolicy`] and asks the host to persist and notify
pub struct Reconciler<'h, H: PlaylistHost + ?Sized> {
    host: &'h H,
    config: ReconcileConfig,
    scanner: FolderScanner,
}

impl<'h, H: PlaylistHost + ?Sized> Reconciler<'h, H> {
    /// Create a reconciler with default configuration.
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, ReconcileConfig::default())
    }

    /// Create a reconciler with custom configuration.
    pub fn with_config(host: &'h H, config: ReconcileConfig) -> Self {
        Self {
            host,
            config,
            scanner: FolderScanner::new(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Get the host's current playlist.
    pub fn active_playlist(&self) -> Result<H::Playlist, ReconcileError> {
        self.host
            .current_playlist()
            .ok_or(ReconcileError::NoActivePlaylist)
    }

    /// Read the sync folder associated with a playlist.
    ///
    /// An empty stored value counts as no association.
    pub fn root_association(&self, playlist: &H::Playlist) -> Option<PathBuf> {
        self.host
            .metadata(playlist, &self.config.root_key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Sync the current playlist with its associated folder.
    pub fn sync(&self) -> Result<ReconcileReport, ReconcileError> {
        match self.active_playlist() {
            Ok(playlist) => self.sync_playlist(&playlist),
            Err(_) => Ok(self.inactive(Operation::Sync)),
        }
    }

    /// Make a playlist mirror the files under its associated folder.
    ///
    /// The folder is scanned before the host lock is taken. Entries whose
    /// file is no longer in the folder are removed, as are repeated entries
    /// for the same file. Files without an entry are appended in scan order.
    /// Surviving entries keep their relative order.
    ///
    /// Fails without touching the playlist if no folder is associated or the
    /// folder cannot be scanned.
    pub fn sync_playlist(&self, playlist: &H::Playlist) -> Result<ReconcileReport, ReconcileError> {
        let root = self
            .root_association(playlist)
            .ok_or(ReconcileError::NoRootConfigured)?;

        let snapshot = self.scan(&root)?;

        let mut report = ReconcileReport::new(Operation::Sync);
        report.scan = Some(ScanSummary::from(&snapshot));

        {
            let _lock = PlaylistLock::acquire(self.host);
            let mut pending = WorkingSet::new(&snapshot);

            for entry in self.host.entries(playlist) {
                let Some(identity) = self.host.identity(&entry) else {
                    debug!(target: TARGET, "skipping entry without identity");
                    report.skipped += 1;
                    continue;
                };

                if pending.claim(&identity) {
                    report.kept += 1;
                } else {
                    self.remove_entry(playlist, &entry, identity, &mut report);
                }
            }

            if pending.remaining() > 0 {
                self.host.begin_append(playlist);
                for identity in pending.unclaimed() {
                    match self.host.append(playlist, identity) {
                        Ok(()) => report.added += 1,
                        Err(err) => {
                            warn!(target: TARGET, identity = %identity, error = %err, "could not append file");
                            report.record_failure(EntryMutationFailure::new(
                                identity.clone(),
                                MutationKind::Add,
                                &err,
                            ));
                        }
                    }
                }
                self.host.end_append(playlist);
            }
        }

        self.finish(playlist, &report);
        Ok(report)
    }

    /// Remove vanished entries from the current playlist.
    pub fn remove_vanished(&self) -> ReconcileReport {
        match self.active_playlist() {
            Ok(playlist) => self.remove_vanished_playlist(&playlist),
            Err(_) => self.inactive(Operation::RemoveVanished),
        }
    }

    /// Remove every entry whose local file no longer exists.
    ///
    /// Entries the host reports as non-local are kept. Each distinct file is
    /// checked once per pass, and every entry for a missing file is removed.
    pub fn remove_vanished_playlist(&self, playlist: &H::Playlist) -> ReconcileReport {
        let mut report = ReconcileReport::new(Operation::RemoveVanished);

        {
            let _lock = PlaylistLock::acquire(self.host);
            let mut exists: HashMap<FileIdentity, bool> = HashMap::new();

            for entry in self.host.entries(playlist) {
                let Some(identity) = self.host.identity(&entry) else {
                    report.skipped += 1;
                    continue;
                };

                if !self.host.is_local(&identity) {
                    report.kept += 1;
                    continue;
                }

                let present = match exists.get(&identity) {
                    Some(present) => *present,
                    None => {
                        let present = self.exists_on_disk(&identity);
                        exists.insert(identity.clone(), present);
                        present
                    }
                };

                if present {
                    report.kept += 1;
                } else {
                    debug!(target: TARGET, identity = %identity, "file vanished");
                    self.remove_entry(playlist, &entry, identity, &mut report);
                }
            }
        }

        self.finish(playlist, &report);
        report
    }

    /// Remove duplicate entries from the current playlist.
    pub fn remove_duplicates(&self) -> ReconcileReport {
        match self.active_playlist() {
            Ok(playlist) => self.remove_duplicates_playlist(&playlist),
            Err(_) => self.inactive(Operation::RemoveDuplicates),
        }
    }

    /// Keep the first entry for each file and remove the rest.
    pub fn remove_duplicates_playlist(&self, playlist: &H::Playlist) -> ReconcileReport {
        let mut report = ReconcileReport::new(Operation::RemoveDuplicates);

        {
            let _lock = PlaylistLock::acquire(self.host);
            let mut seen: HashSet<FileIdentity> = HashSet::new();

            for entry in self.host.entries(playlist) {
                let Some(identity) = self.host.identity(&entry) else {
                    report.skipped += 1;
                    continue;
                };

                if seen.contains(&identity) {
                    self.remove_entry(playlist, &entry, identity, &mut report);
                } else {
                    seen.insert(identity);
                    report.kept += 1;
                }
            }
        }

        self.finish(playlist, &report);
        report
    }

    /// Forget the sync folder of the current playlist.
    pub fn clear_root_association(&self) -> ReconcileReport {
        match self.active_playlist() {
            Ok(playlist) => self.clear_root_association_playlist(&playlist),
            Err(_) => self.inactive(Operation::ClearRootAssociation),
        }
    }

    /// Delete the stored sync folder of a playlist. Entries are untouched.
    pub fn clear_root_association_playlist(&self, playlist: &H::Playlist) -> ReconcileReport {
        let mut report = ReconcileReport::new(Operation::ClearRootAssociation);

        {
            let _lock = PlaylistLock::acquire(self.host);
            report.association_changed =
                self.host.delete_metadata(playlist, &self.config.root_key);
        }

        self.finish(playlist, &report);
        report
    }

    /// Store `folder` as the sync folder of a playlist.
    ///
    /// The metadata is only written when the value differs from the stored
    /// one. Folders whose path is not valid UTF-8 cannot be stored and leave
    /// the association unchanged.
    pub fn set_root_association(&self, playlist: &H::Playlist, folder: &Path) -> ReconcileReport {
        let mut report = ReconcileReport::new(Operation::SetRootAssociation);
        let Some(value) = folder.to_str() else {
            warn!(
                target: TARGET,
                folder = %folder.display(),
                "sync folder is not valid UTF-8, keeping previous folder"
            );
            return report;
        };

        {
            let _lock = PlaylistLock::acquire(self.host);
            let current = self.host.metadata(playlist, &self.config.root_key);
            if current.as_deref() != Some(value) {
                self.host
                    .set_metadata(playlist, &self.config.root_key, value);
                report.association_changed = true;
            }
        }

        self.finish(playlist, &report);
        report
    }

    fn scan(&self, root: &Path) -> Result<DirectorySnapshot, ReconcileError> {
        let snapshot = self
            .scanner
            .scan(&self.config.scan_config(root))
            .inspect_err(|err| {
                warn!(target: TARGET, root = %root.display(), error = %err, "sync aborted");
            })?;

        for warning in &snapshot.warnings {
            debug!(target: TARGET, path = %warning.path.display(), "{}", warning.message);
        }
        Ok(snapshot)
    }

    fn remove_entry(
        &self,
        playlist: &H::Playlist,
        entry: &H::Entry,
        identity: FileIdentity,
        report: &mut ReconcileReport,
    ) {
        match self.host.remove(playlist, entry) {
            Ok(()) => report.removed += 1,
            Err(err) => {
                warn!(target: TARGET, identity = %identity, error = %err, "could not remove entry");
                report.record_failure(EntryMutationFailure::new(
                    identity,
                    MutationKind::Remove,
                    &err,
                ));
            }
        }
    }

    fn finish(&self, playlist: &H::Playlist, report: &ReconcileReport) {
        let flag = match self.config.modified_policy {
            ModifiedPolicy::Always => true,
            ModifiedPolicy::OnChange => report.mutated(),
        };

        if flag {
            self.host.mark_modified(playlist);
            self.host.persist(playlist);
            self.host.notify_changed(playlist);
        }

        info!(
            target: TARGET,
            operation = %report.operation,
            kept = report.kept,
            removed = report.removed,
            added = report.added,
            failed = report.failed,
            "{}",
            report.summary()
        );
    }

    fn exists_on_disk(&self, identity: &FileIdentity) -> bool {
        let path = identity
            .local_path()
            .unwrap_or_else(|| Cow::Borrowed(Path::new(identity.as_str())));
        self.host.file_exists(&path)
    }

    fn inactive(&self, operation: Operation) -> ReconcileReport {
        debug!(target: TARGET, operation = %operation, "no active playlist");
        ReconcileReport::inactive(operation)
    }
}
