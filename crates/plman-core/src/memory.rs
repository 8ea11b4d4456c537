//! In-memory [`PlaylistHost`] implementation.
//!
//! `MemoryHost` keeps playlists in plain vectors and records every call made
//! through the host contract, which makes it suitable for embedding the
//! reconciler outside of a player and for asserting exactly which host
//! primitives an operation issued.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HostError;
use crate::host::PlaylistHost;
use crate::identity::FileIdentity;

/// Handle to a playlist held by a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaylistId(usize);

/// Handle to an entry held by a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

/// A host primitive invoked on a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    CurrentPlaylist,
    Metadata { key: String },
    SetMetadata { key: String, value: String },
    DeleteMetadata { key: String },
    Entries,
    /// Removal attempt for an entry with the given identity.
    Remove(Option<FileIdentity>),
    BeginAppend,
    /// Append attempt for the given identity.
    Append(FileIdentity),
    EndAppend,
    Lock,
    Unlock,
    MarkModified,
    Persist,
    NotifyChanged,
    ChooseDirectory { initial: Option<PathBuf> },
    /// Existence check for a local path.
    Exists { path: PathBuf },
}

impl HostCall {
    /// Check whether this call changes playlist state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::SetMetadata { .. }
                | Self::DeleteMetadata { .. }
                | Self::Remove(_)
                | Self::BeginAppend
                | Self::Append(_)
                | Self::EndAppend
                | Self::MarkModified
                | Self::Persist
                | Self::NotifyChanged
        )
    }
}

#[derive(Debug, Default)]
struct PlaylistState {
    entries: Vec<EntryId>,
    metadata: BTreeMap<String, String>,
    modified_count: usize,
    persist_count: usize,
}

#[derive(Debug, Default)]
struct HostState {
    playlists: Vec<PlaylistState>,
    current: Option<usize>,
    identities: HashMap<EntryId, Option<FileIdentity>>,
    next_entry: u64,
    calls: Vec<HostCall>,
    lock_depth: usize,
    max_lock_depth: usize,
    rejected_appends: HashSet<FileIdentity>,
    rejected_removes: HashSet<FileIdentity>,
    chosen_directory: Option<PathBuf>,
}

impl HostState {
    fn new_entry(&mut self, identity: Option<FileIdentity>) -> EntryId {
        let id = EntryId(self.next_entry);
        self.next_entry += 1;
        self.identities.insert(id, identity);
        id
    }

    fn playlist_mut(&mut self, id: PlaylistId) -> &mut PlaylistState {
        &mut self.playlists[id.0]
    }
}

/// A [`PlaylistHost`] backed by in-memory playlists.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: RefCell<HostState>,
}

impl MemoryHost {
    /// Create a host with no playlists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host with one playlist holding `items`, selected as current.
    pub fn with_playlist<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FileIdentity>,
    {
        let host = Self::new();
        let id = host.add_playlist(items);
        host.select(Some(id));
        host
    }

    /// Add a playlist holding `items`. The current selection is unchanged.
    pub fn add_playlist<I>(&self, items: I) -> PlaylistId
    where
        I: IntoIterator,
        I::Item: Into<FileIdentity>,
    {
        let mut state = self.state.borrow_mut();
        let mut playlist = PlaylistState::default();
        for item in items {
            let entry = state.new_entry(Some(item.into()));
            playlist.entries.push(entry);
        }
        state.playlists.push(playlist);
        PlaylistId(state.playlists.len() - 1)
    }

    /// Select the current playlist, or clear the selection.
    pub fn select(&self, playlist: Option<PlaylistId>) {
        self.state.borrow_mut().current = playlist.map(|p| p.0);
    }

    /// Get the currently selected playlist.
    pub fn current_id(&self) -> Option<PlaylistId> {
        self.state.borrow().current.map(PlaylistId)
    }

    /// Append an entry whose identity the host cannot report.
    pub fn push_unidentified(&self, playlist: PlaylistId) -> EntryId {
        let mut state = self.state.borrow_mut();
        let entry = state.new_entry(None);
        state.playlist_mut(playlist).entries.push(entry);
        entry
    }

    /// Identities of the playlist's entries, in order. Unidentified entries
    /// are left out.
    pub fn identities(&self, playlist: PlaylistId) -> Vec<String> {
        let state = self.state.borrow();
        state.playlists[playlist.0]
            .entries
            .iter()
            .filter_map(|e| state.identities.get(e).cloned().flatten())
            .map(|i| i.as_str().to_string())
            .collect()
    }

    /// Number of entries in the playlist.
    pub fn len(&self, playlist: PlaylistId) -> usize {
        self.state.borrow().playlists[playlist.0].entries.len()
    }

    /// Check whether the playlist has no entries.
    pub fn is_empty(&self, playlist: PlaylistId) -> bool {
        self.len(playlist) == 0
    }

    /// Set playlist metadata without recording a host call.
    pub fn set_meta(&self, playlist: PlaylistId, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .playlist_mut(playlist)
            .metadata
            .insert(key.to_string(), value.to_string());
    }

    /// Read playlist metadata without recording a host call.
    pub fn meta(&self, playlist: PlaylistId, key: &str) -> Option<String> {
        self.state.borrow().playlists[playlist.0].metadata.get(key).cloned()
    }

    /// Make every append of `identity` fail.
    pub fn reject_append(&self, identity: impl Into<FileIdentity>) {
        self.state.borrow_mut().rejected_appends.insert(identity.into());
    }

    /// Make every removal of an entry with `identity` fail.
    pub fn reject_remove(&self, identity: impl Into<FileIdentity>) {
        self.state.borrow_mut().rejected_removes.insert(identity.into());
    }

    /// Set the folder returned by the next folder-picker requests.
    pub fn set_chosen_directory(&self, dir: Option<PathBuf>) {
        self.state.borrow_mut().chosen_directory = dir;
    }

    /// All host calls recorded so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.borrow().calls.clone()
    }

    /// Recorded host calls that change playlist state.
    pub fn mutation_calls(&self) -> Vec<HostCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    /// Forget all recorded calls.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Check whether the host lock is currently held.
    pub fn is_locked(&self) -> bool {
        self.state.borrow().lock_depth > 0
    }

    /// Deepest lock nesting observed. Anything above 1 is a reentrant lock.
    pub fn max_lock_depth(&self) -> usize {
        self.state.borrow().max_lock_depth
    }

    /// Number of times the playlist was flagged as modified.
    pub fn modified_count(&self, playlist: PlaylistId) -> usize {
        self.state.borrow().playlists[playlist.0].modified_count
    }

    /// Number of times the playlist was saved.
    pub fn persist_count(&self, playlist: PlaylistId) -> usize {
        self.state.borrow().playlists[playlist.0].persist_count
    }

    fn record(&self, call: HostCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl PlaylistHost for MemoryHost {
    type Playlist = PlaylistId;
    type Entry = EntryId;

    fn current_playlist(&self) -> Option<PlaylistId> {
        self.record(HostCall::CurrentPlaylist);
        let state = self.state.borrow();
        state
            .current
            .filter(|idx| *idx < state.playlists.len())
            .map(PlaylistId)
    }

    fn metadata(&self, playlist: &PlaylistId, key: &str) -> Option<String> {
        self.record(HostCall::Metadata { key: key.to_string() });
        self.meta(*playlist, key)
    }

    fn set_metadata(&self, playlist: &PlaylistId, key: &str, value: &str) {
        self.record(HostCall::SetMetadata {
            key: key.to_string(),
            value: value.to_string(),
        });
        self.set_meta(*playlist, key, value);
    }

    fn delete_metadata(&self, playlist: &PlaylistId, key: &str) -> bool {
        self.record(HostCall::DeleteMetadata { key: key.to_string() });
        self.state
            .borrow_mut()
            .playlist_mut(*playlist)
            .metadata
            .remove(key)
            .is_some()
    }

    fn entries(&self, playlist: &PlaylistId) -> Vec<EntryId> {
        self.record(HostCall::Entries);
        self.state.borrow().playlists[playlist.0].entries.clone()
    }

    fn identity(&self, entry: &EntryId) -> Option<FileIdentity> {
        self.state.borrow().identities.get(entry).cloned().flatten()
    }

    fn remove(&self, playlist: &PlaylistId, entry: &EntryId) -> Result<(), HostError> {
        let identity = self.identity(entry);
        self.record(HostCall::Remove(identity.clone()));

        let mut state = self.state.borrow_mut();
        if let Some(identity) = identity.filter(|i| state.rejected_removes.contains(i)) {
            return Err(HostError::rejected(identity, "removal refused"));
        }
        let entries = &mut state.playlist_mut(*playlist).entries;
        let pos = entries
            .iter()
            .position(|e| e == entry)
            .ok_or(HostError::StaleEntry)?;
        entries.remove(pos);
        state.identities.remove(entry);
        Ok(())
    }

    fn begin_append(&self, _playlist: &PlaylistId) {
        self.record(HostCall::BeginAppend);
    }

    fn append(&self, playlist: &PlaylistId, identity: &FileIdentity) -> Result<(), HostError> {
        self.record(HostCall::Append(identity.clone()));

        let mut state = self.state.borrow_mut();
        if state.rejected_appends.contains(identity) {
            return Err(HostError::rejected(identity.clone(), "unsupported file"));
        }
        let entry = state.new_entry(Some(identity.clone()));
        state.playlist_mut(*playlist).entries.push(entry);
        Ok(())
    }

    fn end_append(&self, _playlist: &PlaylistId) {
        self.record(HostCall::EndAppend);
    }

    fn lock(&self) {
        self.record(HostCall::Lock);
        let mut state = self.state.borrow_mut();
        state.lock_depth += 1;
        state.max_lock_depth = state.max_lock_depth.max(state.lock_depth);
    }

    fn unlock(&self) {
        self.record(HostCall::Unlock);
        let mut state = self.state.borrow_mut();
        state.lock_depth = state.lock_depth.saturating_sub(1);
    }

    fn mark_modified(&self, playlist: &PlaylistId) {
        self.record(HostCall::MarkModified);
        self.state.borrow_mut().playlist_mut(*playlist).modified_count += 1;
    }

    fn persist(&self, playlist: &PlaylistId) {
        self.record(HostCall::Persist);
        self.state.borrow_mut().playlist_mut(*playlist).persist_count += 1;
    }

    fn notify_changed(&self, _playlist: &PlaylistId) {
        self.record(HostCall::NotifyChanged);
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.record(HostCall::Exists {
            path: path.to_path_buf(),
        });
        fs::metadata(path).is_ok()
    }

    fn choose_directory(&self, initial: Option<&Path>) -> Option<PathBuf> {
        self.record(HostCall::ChooseDirectory {
            initial: initial.map(Path::to_path_buf),
        });
        self.state.borrow().chosen_directory.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_playlist_selects_it() {
        let host = MemoryHost::with_playlist(["/m/a.mp3", "/m/b.mp3"]);
        let id = host.current_playlist().unwrap();

        assert_eq!(host.identities(id), vec!["/m/a.mp3", "/m/b.mp3"]);
        assert_eq!(host.len(id), 2);
    }

    #[test]
    fn test_remove_keeps_other_handles_valid() {
        let host = MemoryHost::with_playlist(["/m/a.mp3", "/m/b.mp3", "/m/c.mp3"]);
        let id = host.current_id().unwrap();
        let entries = host.entries(&id);

        host.remove(&id, &entries[1]).unwrap();
        assert_eq!(host.identity(&entries[2]), Some(FileIdentity::from("/m/c.mp3")));
        assert_eq!(host.identities(id), vec!["/m/a.mp3", "/m/c.mp3"]);

        assert_eq!(host.remove(&id, &entries[1]), Err(HostError::StaleEntry));
    }

    #[test]
    fn test_rejections() {
        let host = MemoryHost::with_playlist(["/m/a.mp3"]);
        let id = host.current_id().unwrap();
        host.reject_append("/m/bad.mp3");
        host.reject_remove("/m/a.mp3");

        assert!(host.append(&id, &FileIdentity::from("/m/bad.mp3")).is_err());
        let entries = host.entries(&id);
        assert!(host.remove(&id, &entries[0]).is_err());
        assert_eq!(host.identities(id), vec!["/m/a.mp3"]);
    }

    #[test]
    fn test_mutation_calls_filter_reads() {
        let host = MemoryHost::with_playlist(["/m/a.mp3"]);
        let id = host.current_playlist().unwrap();
        host.metadata(&id, "Sync_Folder");
        host.entries(&id);
        host.file_exists(Path::new("/m/a.mp3"));
        assert!(host.mutation_calls().is_empty());
        assert!(host.calls().contains(&HostCall::Exists {
            path: PathBuf::from("/m/a.mp3")
        }));

        host.set_metadata(&id, "Sync_Folder", "/m");
        assert_eq!(
            host.mutation_calls(),
            vec![HostCall::SetMetadata {
                key: "Sync_Folder".to_string(),
                value: "/m".to_string()
            }]
        );
    }
}
