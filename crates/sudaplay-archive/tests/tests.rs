use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sudaplay_archive::{
    Error, ExtractOptions, HashStrategy, extract_from_reader, extract_to_workspace,
    list_from_reader,
};
use zip::write::SimpleFileOptions;

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .expect("add directory");
        } else {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start file");
            writer.write_all(content).expect("write entry");
        }
    }
    writer.finish().expect("finish zip").into_inner()
}

fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path).map(|mut d| d.next().is_none()).unwrap_or(true)
}

#[test]
fn extract_zip_tree() {
    let data = build_zip(&[
        ("web/", b""),
        ("web/index.html", b"<html></html>"),
        ("web/assets/sprite.png", b"\x89PNG"),
    ]);
    let temp_dir = tempfile::tempdir().unwrap();

    let report = extract_from_reader(Cursor::new(data), temp_dir.path(), &ExtractOptions::default())
        .expect("extraction failed");

    assert_eq!(report.entry_count, 3);
    assert_eq!(report.files().count(), 2);
    assert_eq!(report.total_bytes, 13 + 4);
    assert_eq!(
        std::fs::read(temp_dir.path().join("web/index.html")).unwrap(),
        b"<html></html>"
    );
    assert!(temp_dir.path().join("web/assets/sprite.png").is_file());
}

#[test]
fn traversal_entry_rejects_whole_archive() {
    let data = build_zip(&[
        ("index.html", b"<html></html>"),
        ("../escape.txt", b"owned"),
    ]);
    let temp_dir = tempfile::tempdir().unwrap();
    let out = temp_dir.path().join("out");

    let err = extract_from_reader(Cursor::new(data), &out, &ExtractOptions::default())
        .expect_err("traversal accepted");

    assert!(err.is_path_traversal(), "unexpected error: {err}");
    assert!(!temp_dir.path().join("escape.txt").exists());
    assert!(dir_is_empty(&out), "entries written before validation finished");
}

#[test]
fn entry_limit_is_enforced() {
    let data = build_zip(&[("a.txt", b"1"), ("b.txt", b"2"), ("c.txt", b"3")]);
    let temp_dir = tempfile::tempdir().unwrap();

    let err = extract_from_reader(
        Cursor::new(data),
        temp_dir.path(),
        &ExtractOptions::default().max_entries(2),
    )
    .expect_err("limit ignored");
    assert!(matches!(err, Error::TooManyEntries { count: 3, limit: 2 }));
}

#[test]
fn size_limits_are_enforced() {
    let big = vec![b'x'; 4096];
    let data = build_zip(&[("index.html", b"<html>"), ("big.bin", &big)]);
    let temp_dir = tempfile::tempdir().unwrap();

    let err = extract_from_reader(
        Cursor::new(data.clone()),
        &temp_dir.path().join("a"),
        &ExtractOptions::default().max_entry_bytes(1024),
    )
    .expect_err("entry limit ignored");
    assert!(matches!(err, Error::EntryTooLarge { size: 4096, .. }));

    let err = extract_from_reader(
        Cursor::new(data),
        &temp_dir.path().join("b"),
        &ExtractOptions::default().max_total_bytes(2048),
    )
    .expect_err("total limit ignored");
    assert!(matches!(err, Error::ArchiveTooLarge { limit: 2048 }));
}

/// Rewrite the uncompressed size of every entry, in both the local headers
/// and the central directory, so the archive understates its content.
fn understate_sizes(data: &mut [u8], size: u32) {
    for i in 0..data.len().saturating_sub(4) {
        let signature: [u8; 4] = data[i..i + 4].try_into().unwrap();
        let field = match &signature {
            b"PK\x03\x04" => i + 22,
            b"PK\x01\x02" => i + 24,
            _ => continue,
        };
        data[field..field + 4].copy_from_slice(&size.to_le_bytes());
    }
}

#[test]
fn limits_apply_to_decompressed_bytes() {
    let mut data = build_zip(&[("big.bin", &[0u8; 4096])]);
    understate_sizes(&mut data, 10);
    assert_eq!(list_from_reader(Cursor::new(data.clone())).unwrap().declared_bytes, 10);

    let temp_dir = tempfile::tempdir().unwrap();
    let builds = temp_dir.path().join("builds");

    let dest = builds.join("1");
    let result = extract_to_workspace(
        Cursor::new(data.clone()),
        &dest,
        &ExtractOptions::default().max_entry_bytes(100),
    );
    assert!(matches!(result, Err(Error::EntryTooLarge { limit: 100, .. })));
    assert!(!dest.exists());
    assert!(dir_is_empty(&builds));

    let dest = builds.join("2");
    let result = extract_to_workspace(
        Cursor::new(data),
        &dest,
        &ExtractOptions::default().max_total_bytes(100),
    );
    assert!(matches!(result, Err(Error::ArchiveTooLarge { limit: 100 })));
    assert!(!dest.exists());
    assert!(dir_is_empty(&builds));
}

#[test]
fn sha256_and_progress_reported() {
    let data = build_zip(&[("index.html", b"hello world"), ("js/", b"")]);
    let temp_dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let options = ExtractOptions::default()
        .hash_strategy(HashStrategy::Sha256)
        .on_progress(Arc::new(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));
    let report = extract_from_reader(Cursor::new(data), temp_dir.path(), &options).unwrap();

    let index = report.files().next().unwrap();
    assert_eq!(
        index.hash.as_deref(),
        Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn workspace_commit_replaces_destination() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dest = temp_dir.path().join("builds/42");
    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("stale.js"), "old").unwrap();

    let data = build_zip(&[("index.html", b"<html>")]);
    let extraction =
        extract_to_workspace(Cursor::new(data), &dest, &ExtractOptions::default()).unwrap();
    assert!(!dest.join("index.html").exists());
    assert!(extraction.staging_path().join("index.html").exists());

    let report = extraction.commit().unwrap();
    assert!(dest.join("index.html").exists());
    assert!(!dest.join("stale.js").exists());
    assert_eq!(report.entries[0].target_path, dest.join("index.html"));
}

#[test]
fn workspace_failure_leaves_no_staging() {
    let temp_dir = tempfile::tempdir().unwrap();
    let builds = temp_dir.path().join("builds");
    let dest = builds.join("7");

    let data = build_zip(&[("ok.txt", b"fine"), ("../../evil.txt", b"no")]);
    let result = extract_to_workspace(Cursor::new(data), &dest, &ExtractOptions::default());

    assert!(matches!(result, Err(ref e) if e.is_path_traversal()));
    assert!(!dest.exists());
    assert!(dir_is_empty(&builds));
}

#[test]
fn listing_reads_names_only() {
    let data = build_zip(&[("Game/Index.html", b"<html>"), ("Game/readme.txt", b"hi")]);
    let listing = list_from_reader(Cursor::new(data)).unwrap();

    assert_eq!(listing.names, vec!["Game/Index.html", "Game/readme.txt"]);
    assert_eq!(listing.declared_bytes, 8);
    assert!(listing.contains_name_ending_with("index.html"));
}
