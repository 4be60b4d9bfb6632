use sudaplay_fs::{
    Durability, Workspace, atomic_read, atomic_write, remove_dir_best_effort,
};
use tempfile::tempdir;

#[test]
fn test_atomic_write_overwrites_existing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("existing.json");

    std::fs::write(&path, "original").unwrap();
    atomic_write(&path, b"new content", Durability::Buffered).unwrap();

    assert_eq!(atomic_read(&path).unwrap(), b"new content");
}

#[test]
fn test_staged_replace_of_existing_build() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("builds/9");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("leftover.js"), "old").unwrap();

    let workspace = Workspace::beside(&dest).unwrap();
    std::fs::write(workspace.path().join("index.html"), "<html>").unwrap();
    let committed = workspace.commit().unwrap();

    assert_eq!(committed, dest);
    assert!(dest.join("index.html").exists());
    assert!(!dest.join("leftover.js").exists());

    let siblings: Vec<_> = std::fs::read_dir(dir.path().join("builds"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(siblings.len(), 1);
}

#[test]
fn test_abandoned_workspace_leaves_nothing() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("builds/3");

    let staging = {
        let workspace = Workspace::beside(&dest).unwrap();
        std::fs::write(workspace.path().join("partial.bin"), [0u8; 16]).unwrap();
        workspace.path().to_path_buf()
    };

    assert!(!staging.exists());
    assert!(!dest.exists());
    assert!(remove_dir_best_effort(&dest));
}
