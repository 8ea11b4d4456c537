use plman_core::memory::{HostCall, MemoryHost, PlaylistId};
use plman_core::PlaylistHost;
use plman_reconcile::{
    ModifiedPolicy, MutationKind, Operation, Outcome, ReconcileConfig, ReconcileError, Reconciler,
};
use plman_scan::{FolderScanner, ScanConfig};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

/// Create a music folder with a few tracks, a cover image and a subfolder.
fn music_folder() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("01.mp3"), "x").unwrap();
    fs::write(root.join("02.mp3"), "x").unwrap();
    fs::write(root.join("cover.jpg"), "x").unwrap();
    fs::create_dir(root.join("disc2")).unwrap();
    fs::write(root.join("disc2/01.flac"), "x").unwrap();
    fs::write(root.join("disc2/scan.png"), "x").unwrap();
    temp
}

fn scan_order(root: &Path) -> Vec<String> {
    FolderScanner::new()
        .scan(&ScanConfig::new(root))
        .unwrap()
        .iter()
        .map(|f| f.as_str().to_string())
        .collect()
}

fn synced_host(root: &Path, items: Vec<String>) -> (MemoryHost, PlaylistId) {
    let host = MemoryHost::with_playlist(items);
    let id = host.current_id().unwrap();
    host.set_meta(id, "Sync_Folder", &path_str(root));
    (host, id)
}

#[test]
fn test_sync_fills_empty_playlist_in_scan_order() {
    let temp = music_folder();
    let (host, id) = synced_host(temp.path(), vec![]);

    let report = Reconciler::new(&host).sync().unwrap();

    assert_eq!(host.identities(id), scan_order(temp.path()));
    assert_eq!(report.added, 3);
    assert_eq!(report.removed, 0);
    assert_eq!(report.scan.as_ref().unwrap().files_excluded, 2);
}

#[test]
fn test_sync_preserves_order_of_surviving_entries() {
    let temp = music_folder();
    let root = temp.path();
    let two = path_str(&root.join("02.mp3"));
    let one = path_str(&root.join("01.mp3"));
    let gone = path_str(&root.join("deleted.mp3"));
    let (host, id) = synced_host(root, vec![two.clone(), gone, one.clone()]);

    let report = Reconciler::new(&host).sync().unwrap();

    let playlist = host.identities(id);
    assert_eq!(&playlist[..2], &[two, one]);
    assert_eq!(playlist[2], path_str(&root.join("disc2").join("01.flac")));
    assert_eq!(report.kept, 2);
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 1);
}

#[test]
fn test_sync_matches_folder_contents() {
    let temp = music_folder();
    let root = temp.path();
    let (host, id) = synced_host(
        root,
        vec![
            path_str(&root.join("01.mp3")),
            "/elsewhere/track.mp3".to_string(),
        ],
    );

    Reconciler::new(&host).sync().unwrap();

    let playlist: HashSet<String> = host.identities(id).into_iter().collect();
    let folder: HashSet<String> = scan_order(root).into_iter().collect();
    assert_eq!(playlist, folder);
    assert_eq!(host.len(id), folder.len());
}

#[test]
fn test_sync_is_idempotent() {
    let temp = music_folder();
    let (host, id) = synced_host(temp.path(), vec![]);
    let reconciler = Reconciler::new(&host);

    reconciler.sync().unwrap();
    let after_first = host.identities(id);
    host.clear_calls();

    let second = reconciler.sync().unwrap();

    assert!(second.is_noop());
    assert_eq!(host.identities(id), after_first);
    assert!(host.mutation_calls().is_empty());
}

#[test]
fn test_sync_removes_repeated_entries() {
    let temp = music_folder();
    let root = temp.path();
    let one = path_str(&root.join("01.mp3"));
    let (host, id) = synced_host(root, vec![one.clone(), one.clone()]);

    let report = Reconciler::new(&host).sync().unwrap();

    let playlist = host.identities(id);
    assert_eq!(playlist.iter().filter(|i| **i == one).count(), 1);
    assert_eq!(playlist[0], one);
    assert_eq!(report.removed, 1);
}

#[test]
fn test_sync_leaves_excluded_images_out() {
    let temp = music_folder();
    let (host, id) = synced_host(temp.path(), vec![]);

    Reconciler::new(&host).sync().unwrap();

    assert!(
        host.identities(id)
            .iter()
            .all(|i| !i.ends_with(".jpg") && !i.ends_with(".png"))
    );
}

#[test]
fn test_sync_with_deleted_root_leaves_playlist_untouched() {
    let temp = music_folder();
    let root = temp.path().join("gone");
    let (host, id) = synced_host(&root, vec!["/m/a.mp3".to_string()]);

    let result = Reconciler::new(&host).sync();

    assert!(matches!(result, Err(ReconcileError::Scan(_))));
    assert_eq!(host.identities(id), vec!["/m/a.mp3"]);
    assert!(host.mutation_calls().is_empty());
    assert!(!host.calls().contains(&HostCall::Lock));
}

#[test]
fn test_sync_brackets_appends() {
    let temp = music_folder();
    let (host, _) = synced_host(temp.path(), vec![]);

    Reconciler::new(&host).sync().unwrap();

    let calls = host.calls();
    let begin = calls.iter().position(|c| *c == HostCall::BeginAppend).unwrap();
    let end = calls.iter().position(|c| *c == HostCall::EndAppend).unwrap();
    let appends: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, HostCall::Append(_)))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(appends.len(), 3);
    assert!(appends.iter().all(|i| *i > begin && *i < end));
}

#[test]
fn test_append_failure_is_not_fatal() {
    let temp = music_folder();
    let root = temp.path();
    let (host, id) = synced_host(root, vec![]);
    let refused = path_str(&root.join("02.mp3"));
    host.reject_append(refused.as_str());

    let report = Reconciler::new(&host).sync().unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.errors[0].kind, MutationKind::Add);
    assert_eq!(report.errors[0].identity.as_str(), refused);
    assert!(!host.identities(id).contains(&refused));
}

#[test]
fn test_remove_failure_is_not_fatal() {
    let host = MemoryHost::with_playlist(["A", "B", "A", "B"]);
    let id = host.current_id().unwrap();
    host.reject_remove("A");

    let report = Reconciler::new(&host).remove_duplicates();

    assert_eq!(report.removed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.errors[0].kind, MutationKind::Remove);
    assert_eq!(host.identities(id), vec!["A", "B", "A"]);
}

#[test]
fn test_remove_duplicates_first_occurrence_wins() {
    let host = MemoryHost::with_playlist(["A", "B", "A", "C", "B"]);
    let id = host.current_id().unwrap();

    let report = Reconciler::new(&host).remove_duplicates();

    assert_eq!(host.identities(id), vec!["A", "B", "C"]);
    assert_eq!(report.removed, 2);
    assert!(report.is_success());
}

#[test]
fn test_remove_vanished_removes_every_occurrence() {
    let temp = TempDir::new().unwrap();
    let kept = temp.path().join("kept.mp3");
    let lost = temp.path().join("lost.mp3");
    fs::write(&kept, "x").unwrap();
    fs::write(&lost, "x").unwrap();

    let host = MemoryHost::with_playlist([
        path_str(&lost),
        path_str(&kept),
        "https://example.com/live.ogg".to_string(),
        path_str(&lost),
    ]);
    let id = host.current_id().unwrap();
    fs::remove_file(&lost).unwrap();

    let report = Reconciler::new(&host).remove_vanished();

    assert_eq!(
        host.identities(id),
        vec![path_str(&kept), "https://example.com/live.ogg".to_string()]
    );
    assert_eq!(report.removed, 2);
    assert_eq!(report.kept, 2);
}

#[test]
fn test_remove_vanished_understands_file_uris() {
    let temp = TempDir::new().unwrap();
    let track = temp.path().join("a.mp3");
    fs::write(&track, "x").unwrap();
    let uri = format!("file://{}", path_str(&track));

    let host = MemoryHost::with_playlist([uri.clone()]);
    let id = host.current_id().unwrap();

    let report = Reconciler::new(&host).remove_vanished();

    assert!(report.is_noop());
    assert_eq!(host.identities(id), vec![uri]);
}

#[test]
fn test_remove_vanished_decodes_escaped_file_uris() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("My Song.mp3"), "x").unwrap();
    let escaped = format!("file://{}/My%20Song.mp3", path_str(temp.path()));
    let missing = format!("file://{}/Other%20Song.mp3", path_str(temp.path()));

    let host = MemoryHost::with_playlist([escaped.clone(), missing]);
    let id = host.current_id().unwrap();

    let report = Reconciler::new(&host).remove_vanished();

    assert_eq!(host.identities(id), vec![escaped]);
    assert_eq!(report.kept, 1);
    assert_eq!(report.removed, 1);
}

#[test]
fn test_remove_vanished_checks_each_file_once() {
    let temp = TempDir::new().unwrap();
    let x = path_str(&temp.path().join("x.mp3"));
    let y = temp.path().join("y.mp3");
    fs::write(&y, "x").unwrap();
    let y = path_str(&y);

    let host = MemoryHost::with_playlist([x.clone(), y.clone(), x.clone(), x]);
    let id = host.current_id().unwrap();

    let report = Reconciler::new(&host).remove_vanished();

    let checks = host
        .calls()
        .into_iter()
        .filter(|call| matches!(call, HostCall::Exists { .. }))
        .count();
    assert_eq!(checks, 2);
    assert_eq!(host.identities(id), vec![y]);
    assert_eq!(report.removed, 3);
    assert_eq!(report.kept, 1);
}

#[test]
fn test_operations_without_playlist_do_nothing() {
    let host = MemoryHost::new();
    let reconciler = Reconciler::new(&host);

    let reports = [
        reconciler.sync().unwrap(),
        reconciler.remove_vanished(),
        reconciler.remove_duplicates(),
        reconciler.clear_root_association(),
    ];

    for report in &reports {
        assert_eq!(report.outcome, Outcome::NoActivePlaylist);
        assert!(report.is_noop());
    }
    assert!(host.mutation_calls().is_empty());
    assert!(!host.calls().contains(&HostCall::Lock));
}

#[test]
fn test_entries_without_identity_are_skipped() {
    let temp = music_folder();
    let (host, id) = synced_host(temp.path(), vec![]);
    host.push_unidentified(id);

    let report = Reconciler::new(&host).sync().unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(host.len(id), 4);
}

#[test]
fn test_clear_root_association() {
    let host = MemoryHost::with_playlist(["A", "B"]);
    let id = host.current_id().unwrap();
    host.set_meta(id, "Sync_Folder", "/music");
    let reconciler = Reconciler::new(&host);

    let first = reconciler.clear_root_association();
    assert_eq!(first.operation, Operation::ClearRootAssociation);
    assert!(first.association_changed);
    assert_eq!(host.meta(id, "Sync_Folder"), None);
    assert_eq!(host.identities(id), vec!["A", "B"]);

    let second = reconciler.clear_root_association();
    assert!(!second.association_changed);

    assert!(matches!(
        reconciler.sync(),
        Err(ReconcileError::NoRootConfigured)
    ));
}

#[test]
fn test_custom_root_key() {
    let temp = music_folder();
    let host = MemoryHost::with_playlist(Vec::<String>::new());
    let id = host.current_id().unwrap();
    host.set_meta(id, "Folder", &path_str(temp.path()));
    let config = ReconcileConfig::builder().root_key("Folder").build().unwrap();

    let report = Reconciler::with_config(&host, config).sync().unwrap();
    assert_eq!(report.added, 3);
}

#[test]
fn test_lock_is_balanced_and_never_nested() {
    let temp = music_folder();
    let root = temp.path();
    let (host, _) = synced_host(root, vec!["/elsewhere/x.mp3".to_string()]);
    let reconciler = Reconciler::new(&host);

    reconciler.sync().unwrap();
    reconciler.remove_vanished();
    reconciler.remove_duplicates();
    reconciler.clear_root_association();

    let calls = host.calls();
    let locks = calls.iter().filter(|c| **c == HostCall::Lock).count();
    let unlocks = calls.iter().filter(|c| **c == HostCall::Unlock).count();
    assert_eq!(locks, 4);
    assert_eq!(locks, unlocks);
    assert_eq!(host.max_lock_depth(), 1);
    assert!(!host.is_locked());
}

#[test]
fn test_modified_flag_raised_after_unlock() {
    let temp = music_folder();
    let (host, id) = synced_host(temp.path(), vec![]);

    Reconciler::new(&host).sync().unwrap();

    let calls = host.calls();
    let unlock = calls.iter().rposition(|c| *c == HostCall::Unlock).unwrap();
    let modified = calls.iter().position(|c| *c == HostCall::MarkModified).unwrap();
    assert!(modified > unlock);
    assert_eq!(host.modified_count(id), 1);
    assert!(calls.contains(&HostCall::NotifyChanged));
}

#[test]
fn test_always_policy_marks_unchanged_playlist() {
    let host = MemoryHost::with_playlist(["A"]);
    let id = host.current_id().unwrap();
    let config = ReconcileConfig {
        modified_policy: ModifiedPolicy::Always,
        ..Default::default()
    };

    let report = Reconciler::with_config(&host, config).remove_duplicates();

    assert!(report.is_noop());
    assert_eq!(host.modified_count(id), 1);
}

#[test]
fn test_reconciler_over_trait_object_host() {
    let host = MemoryHost::with_playlist(["A", "A"]);
    let id = host.current_id().unwrap();
    let dyn_host: &dyn PlaylistHost<Playlist = PlaylistId, Entry = plman_core::memory::EntryId> =
        &host;

    let report = Reconciler::new(dyn_host).remove_duplicates();

    assert_eq!(report.removed, 1);
    assert_eq!(host.identities(id), vec!["A"]);
}
