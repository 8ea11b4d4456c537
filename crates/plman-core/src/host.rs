//! The contract between playlist-manager and the player that hosts it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HostError;
use crate::identity::FileIdentity;

/// Services the host application provides to the plugin.
///
/// The host owns every playlist and entry. Handles returned by the host are
/// only valid for the duration of a single plugin operation. All methods
/// take `&self`; the host is expected to serialize access through
/// [`lock`](Self::lock) and [`unlock`](Self::unlock).
///
/// The operations built on this trait are not safe to run concurrently on
/// the same playlist unless the host lock serializes them.
pub trait PlaylistHost {
    /// Handle to a playlist.
    type Playlist;

    /// Handle to one entry of a playlist.
    type Entry;

    /// Get the playlist currently selected in the host, if any.
    fn current_playlist(&self) -> Option<Self::Playlist>;

    /// Read a metadata value stored on a playlist.
    fn metadata(&self, playlist: &Self::Playlist, key: &str) -> Option<String>;

    /// Store a metadata value on a playlist, replacing any previous value.
    fn set_metadata(&self, playlist: &Self::Playlist, key: &str, value: &str);

    /// Delete a metadata value. Returns `true` if the key was present.
    fn delete_metadata(&self, playlist: &Self::Playlist, key: &str) -> bool;

    /// Snapshot the playlist's entries in playlist order.
    ///
    /// Removing one of the returned entries must not invalidate the others.
    fn entries(&self, playlist: &Self::Playlist) -> Vec<Self::Entry>;

    /// Get the file identity of an entry, or `None` if the host has none.
    fn identity(&self, entry: &Self::Entry) -> Option<FileIdentity>;

    /// Check whether an identity names a local file rather than a stream.
    fn is_local(&self, identity: &FileIdentity) -> bool {
        identity.is_local()
    }

    /// Check whether a local file exists.
    fn file_exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }

    /// Remove one entry from the playlist.
    fn remove(&self, playlist: &Self::Playlist, entry: &Self::Entry) -> Result<(), HostError>;

    /// Called once before a batch of [`append`](Self::append) calls.
    fn begin_append(&self, _playlist: &Self::Playlist) {}

    /// Append a file at the end of the playlist.
    fn append(&self, playlist: &Self::Playlist, identity: &FileIdentity) -> Result<(), HostError>;

    /// Called once after a batch of [`append`](Self::append) calls.
    fn end_append(&self, _playlist: &Self::Playlist) {}

    /// Acquire the host's playlist lock. The lock is not reentrant.
    fn lock(&self);

    /// Release the host's playlist lock.
    fn unlock(&self);

    /// Flag the playlist as modified.
    fn mark_modified(&self, playlist: &Self::Playlist);

    /// Ask the host to save the playlist.
    fn persist(&self, _playlist: &Self::Playlist) {}

    /// Tell the host's other subsystems that the playlist changed.
    fn notify_changed(&self, _playlist: &Self::Playlist) {}

    /// Ask the user to pick a folder, starting at `initial` if given.
    ///
    /// Returns `None` when the user cancels or the host has no picker.
    fn choose_directory(&self, _initial: Option<&Path>) -> Option<PathBuf> {
        None
    }
}

/// Scoped hold on the host's playlist lock.
///
/// The lock is released when the guard is dropped, including on early
/// returns and `?` propagation.
#[must_use = "the host lock is released as soon as the guard is dropped"]
pub struct PlaylistLock<'a, H: PlaylistHost + ?Sized> {
    host: &'a H,
}

impl<'a, H: PlaylistHost + ?Sized> PlaylistLock<'a, H> {
    /// Acquire the host lock.
    pub fn acquire(host: &'a H) -> Self {
        host.lock();
        Self { host }
    }
}

impl<H: PlaylistHost + ?Sized> Drop for PlaylistLock<'_, H> {
    fn drop(&mut self) {
        self.host.unlock();
    }
}
