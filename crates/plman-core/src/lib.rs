//! Core types and the host contract for playlist-manager.
//!
//! This crate provides the data types shared by the scanner, the reconciler
//! and the plugin layer: file identities, scan configuration, error types,
//! and the [`PlaylistHost`] trait through which every playlist read and
//! mutation is routed to the player application that owns the playlist.

mod config;
mod error;
mod host;
mod identity;
pub mod memory;

pub use config::{final_extension, ScanConfig, ScanConfigBuilder, DEFAULT_EXCLUDED_EXTENSIONS};
pub use error::{HostError, ScanError, ScanWarning, WarningKind};
pub use host::{PlaylistHost, PlaylistLock};
pub use identity::FileIdentity;
