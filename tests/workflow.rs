use playlist_manager::memory::MemoryHost;
use playlist_manager::{PluginManager, PluginSettings, Reconciler};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_folder_follows_disk_changes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("album")).unwrap();
    fs::write(root.join("album/1.ogg"), "x").unwrap();
    fs::write(root.join("album/2.ogg"), "x").unwrap();
    fs::write(root.join("album/cover.png"), "x").unwrap();

    let host = MemoryHost::with_playlist(Vec::<String>::new());
    let id = host.current_id().unwrap();
    host.set_chosen_directory(Some(root.to_path_buf()));

    let mut manager = PluginManager::new(PluginSettings::default());
    manager.start().unwrap();

    manager.dispatch(&host, "Select_Folder").unwrap();
    let first = manager.dispatch(&host, "Sync_Playlist").unwrap();
    assert_eq!(first.added, 2);

    fs::remove_file(root.join("album/1.ogg")).unwrap();
    fs::write(root.join("album/3.ogg"), "x").unwrap();

    let second = manager.dispatch(&host, "Sync_Playlist").unwrap();
    assert_eq!(second.summary(), "Sync: kept 1, removed 1, added 1");

    let playlist = host.identities(id);
    assert_eq!(playlist.len(), 2);
    assert!(playlist[0].ends_with("2.ogg"));
    assert!(playlist[1].ends_with("3.ogg"));

    manager.stop().unwrap();
}

#[test]
fn test_prune_without_folder() {
    let temp = TempDir::new().unwrap();
    let kept = temp.path().join("kept.flac");
    fs::write(&kept, "x").unwrap();
    let kept = kept.to_str().unwrap().to_string();
    let missing = temp.path().join("missing.flac").to_str().unwrap().to_string();

    let host = MemoryHost::with_playlist([kept.clone(), missing, kept.clone()]);
    let id = host.current_id().unwrap();
    let reconciler = Reconciler::new(&host);

    let vanished = reconciler.remove_vanished();
    let duplicates = reconciler.remove_duplicates();

    assert_eq!(vanished.removed, 1);
    assert_eq!(duplicates.removed, 1);
    assert_eq!(host.identities(id), vec![kept]);
}
