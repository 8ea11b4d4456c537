//! Operation results.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use plman_core::{FileIdentity, HostError};
use plman_scan::DirectorySnapshot;

/// The reconciliation operation a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Sync,
    RemoveVanished,
    RemoveDuplicates,
    ClearRootAssociation,
    SetRootAssociation,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => write!(f, "Sync"),
            Self::RemoveVanished => write!(f, "Remove vanished"),
            Self::RemoveDuplicates => write!(f, "Remove duplicates"),
            Self::ClearRootAssociation => write!(f, "Reset folder"),
            Self::SetRootAssociation => write!(f, "Select folder"),
        }
    }
}

/// Whether an operation ran against a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The operation ran to completion.
    Applied,
    /// No playlist was selected; nothing was done.
    NoActivePlaylist,
}

/// The playlist mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    Add,
    Remove,
}

/// A single add or remove the host refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMutationFailure {
    /// The file involved.
    pub identity: FileIdentity,
    /// What was attempted.
    pub kind: MutationKind,
    /// The host's error message.
    pub message: String,
}

impl EntryMutationFailure {
    /// Create a failure record from a host error.
    pub fn new(identity: FileIdentity, kind: MutationKind, error: &HostError) -> Self {
        Self {
            identity,
            kind,
            message: error.to_string(),
        }
    }
}

/// What a sync scan found.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub root: PathBuf,
    pub files_found: usize,
    pub files_excluded: u64,
    pub dirs_scanned: u64,
    pub dirs_skipped: u64,
    pub warnings: usize,
}

impl From<&DirectorySnapshot> for ScanSummary {
    fn from(snapshot: &DirectorySnapshot) -> Self {
        Self {
            root: snapshot.root().to_path_buf(),
            files_found: snapshot.len(),
            files_excluded: snapshot.stats.files_excluded,
            dirs_scanned: snapshot.stats.dirs_scanned,
            dirs_skipped: snapshot.stats.dirs_skipped,
            warnings: snapshot.warnings.len(),
        }
    }
}

/// Result of one reconciliation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// The operation that ran.
    pub operation: Operation,
    /// Whether a playlist was there to work on.
    pub outcome: Outcome,
    /// Entries left in place.
    pub kept: usize,
    /// Entries removed.
    pub removed: usize,
    /// Entries appended.
    pub added: usize,
    /// Adds or removes the host refused.
    pub failed: usize,
    /// Entries without a readable identity, left untouched.
    pub skipped: usize,
    /// Whether the stored sync folder was set or cleared.
    pub association_changed: bool,
    /// Details of refused mutations.
    pub errors: Vec<EntryMutationFailure>,
    /// Scan results (sync only).
    pub scan: Option<ScanSummary>,
}

impl ReconcileReport {
    /// Create an empty report for an operation that ran.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            outcome: Outcome::Applied,
            kept: 0,
            removed: 0,
            added: 0,
            failed: 0,
            skipped: 0,
            association_changed: false,
            errors: Vec::new(),
            scan: None,
        }
    }

    /// Create a report for an operation skipped for lack of a playlist.
    pub fn inactive(operation: Operation) -> Self {
        Self {
            outcome: Outcome::NoActivePlaylist,
            ..Self::new(operation)
        }
    }

    /// Check whether the playlist or its folder association changed.
    pub fn mutated(&self) -> bool {
        self.removed > 0 || self.added > 0 || self.association_changed
    }

    /// Check whether nothing changed.
    pub fn is_noop(&self) -> bool {
        !self.mutated()
    }

    /// Check whether every attempted mutation succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Record a refused mutation.
    pub fn record_failure(&mut self, failure: EntryMutationFailure) {
        self.failed += 1;
        self.errors.push(failure);
    }

    /// Get a human-readable summary of the operation.
    pub fn summary(&self) -> String {
        if self.outcome == Outcome::NoActivePlaylist {
            return format!("{}: no active playlist", self.operation);
        }

        let mut summary = match self.operation {
            Operation::ClearRootAssociation | Operation::SetRootAssociation => {
                let state = if self.association_changed {
                    "folder association updated"
                } else {
                    "folder association unchanged"
                };
                format!("{}: {}", self.operation, state)
            }
            Operation::Sync => format!(
                "{}: kept {}, removed {}, added {}",
                self.operation, self.kept, self.removed, self.added
            ),
            Operation::RemoveVanished | Operation::RemoveDuplicates => format!(
                "{}: kept {}, removed {}",
                self.operation, self.kept, self.removed
            ),
        };

        if self.failed > 0 {
            summary.push_str(&format!(", {} failed", self.failed));
        }
        if self.skipped > 0 {
            summary.push_str(&format!(", {} skipped", self.skipped));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_sync() {
        let mut report = ReconcileReport::new(Operation::Sync);
        report.kept = 3;
        report.removed = 1;
        report.added = 2;

        assert_eq!(report.summary(), "Sync: kept 3, removed 1, added 2");
        assert!(report.mutated());
        assert!(report.is_success());
    }

    #[test]
    fn test_summary_with_failures() {
        let mut report = ReconcileReport::new(Operation::RemoveDuplicates);
        report.kept = 2;
        report.record_failure(EntryMutationFailure::new(
            FileIdentity::from("/m/a.mp3"),
            MutationKind::Remove,
            &HostError::StaleEntry,
        ));

        assert_eq!(report.summary(), "Remove duplicates: kept 2, removed 0, 1 failed");
        assert!(!report.is_success());
        assert!(report.is_noop());
    }

    #[test]
    fn test_inactive_report() {
        let report = ReconcileReport::inactive(Operation::RemoveVanished);
        assert_eq!(report.outcome, Outcome::NoActivePlaylist);
        assert!(report.is_noop());
        assert_eq!(report.summary(), "Remove vanished: no active playlist");
    }

    #[test]
    fn test_association_summary() {
        let mut report = ReconcileReport::new(Operation::ClearRootAssociation);
        assert_eq!(report.summary(), "Reset folder: folder association unchanged");

        report.association_changed = true;
        assert!(report.mutated());
        assert_eq!(report.summary(), "Reset folder: folder association updated");
    }

    #[test]
    fn test_scan_summary_from_snapshot() {
        let snapshot = DirectorySnapshot::from_files("/m", ["/m/a.mp3", "/m/b.mp3"]);
        let summary = ScanSummary::from(&snapshot);

        assert_eq!(summary.root, PathBuf::from("/m"));
        assert_eq!(summary.files_found, 2);
        assert_eq!(summary.warnings, 0);
    }
}
