//! Reconciliation errors.

use plman_core::ScanError;
use thiserror::Error;

/// Errors that stop a reconciliation operation before it touches the
/// playlist.
///
/// Failures of individual adds or removes are not errors; they are counted
/// in the [`ReconcileReport`](crate::ReconcileReport) and the pass goes on.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The host has no playlist selected.
    #[error("No active playlist")]
    NoActivePlaylist,

    /// Sync was requested for a playlist with no associated folder.
    #[error("No sync folder is associated with the playlist")]
    NoRootConfigured,

    /// The sync folder could not be scanned.
    #[error("Cannot scan sync folder: {0}")]
    Scan(#[from] ScanError),
}
