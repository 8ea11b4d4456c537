//! Error types for scanning and host operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::FileIdentity;

/// Errors that abort a folder scan.
///
/// Only failures on the scan root are fatal. Problems below the root are
/// reported as [`ScanWarning`]s instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No root folder was given.
    #[error("Scan root is empty")]
    EmptyRoot,

    /// Permission denied for the root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory or one of its entries.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// A followed symlink leads back into one of its own ancestors.
    SymlinkLoop,
    /// Directory lies below the configured depth limit.
    DepthLimit,
    /// Path cannot be represented as a file identity.
    InvalidPath,
}

/// Non-fatal warning encountered during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a directory or entry that could not be read.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self {
            message: format!("Read error: {error}"),
            path,
            kind,
        }
    }

    /// Create a symlink loop warning.
    pub fn symlink_loop(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Symlink loop: {}", path.display()),
            path,
            kind: WarningKind::SymlinkLoop,
        }
    }
}

/// Errors reported by the host for a single playlist mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host refused the request for this file.
    #[error("Host rejected {identity}: {message}")]
    Rejected {
        identity: FileIdentity,
        message: String,
    },

    /// The entry is no longer part of the playlist.
    #[error("Entry is no longer in the playlist")]
    StaleEntry,
}

impl HostError {
    /// Create a rejection error.
    pub fn rejected(identity: FileIdentity, message: impl Into<String>) -> Self {
        Self::Rejected {
            identity,
            message: message.into(),
        }
    }
}
