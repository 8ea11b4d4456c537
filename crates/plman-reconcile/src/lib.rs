//! Playlist reconciliation for playlist-manager.
//!
//! A [`Reconciler`] runs one pass over a host playlist and applies the
//! result through the host's mutation primitives:
//!
//! - **Sync** - make the playlist mirror its associated folder: entries for
//!   files no longer in the folder are removed, new files are appended in
//!   scan order, surviving entries keep their order
//! - **Remove vanished** - drop entries whose local file no longer exists
//! - **Remove duplicates** - keep the first entry for each file
//! - **Clear / set root association** - manage the stored sync folder
//!
//! Every pass holds the host lock while it touches playlist entries and
//! releases it before returning.
//!
//! ```rust
//! use plman_core::memory::MemoryHost;
//! use plman_reconcile::Reconciler;
//!
//! let host = MemoryHost::with_playlist(["/m/a.mp3", "/m/b.mp3", "/m/a.mp3"]);
//! let report = Reconciler::new(&host).remove_duplicates();
//!
//! assert_eq!(report.removed, 1);
//! println!("{}", report.summary());
//! ```

mod config;
mod error;
mod reconciler;
mod report;
mod working_set;

pub use config::{ModifiedPolicy, ReconcileConfig, ReconcileConfigBuilder, DEFAULT_ROOT_KEY};
pub use error::ReconcileError;
pub use reconciler::Reconciler;
pub use report::{
    EntryMutationFailure, MutationKind, Operation, Outcome, ReconcileReport, ScanSummary,
};
