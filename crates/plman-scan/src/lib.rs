//! Folder scanning engine for playlist-manager.
//!
//! This crate walks a folder breadth-first and produces a
//! [`DirectorySnapshot`]: the set of file identities found beneath it, in the
//! order the walk yielded them.
//!
//! # Overview
//!
//! - **Explicit worklist** traversal, so directory depth never grows the
//!   call stack
//! - **Extension filtering** (cover art is left out by default)
//! - **Symlink loop detection** when following symlinked directories
//! - **Non-fatal warnings** for unreadable subdirectories
//!
//! # Example
//!
//! ```rust,no_run
//! use plman_scan::{FolderScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/music");
//! let snapshot = FolderScanner::new().scan(&config).unwrap();
//!
//! for file in &snapshot {
//!     println!("{file}");
//! }
//! println!("{} directories scanned", snapshot.stats.dirs_scanned);
//! ```

mod ancestry;
mod scanner;
mod snapshot;

pub use ancestry::{Ancestry, DirKey};
pub use scanner::FolderScanner;
pub use snapshot::{DirectorySnapshot, ScanStats};

// Re-export core types for convenience
pub use plman_core::{FileIdentity, ScanConfig, ScanError, ScanWarning, WarningKind};
