//! Integration test for the annotation store lifecycle.
//!
//! Exercises: load (first run), save, reload, staleness, corruption handling.

use std::fs;
use std::path::PathBuf;

use mdnote_core::store::{content_hash, AnnotationStore};
use mdnote_core::{Comment, SourceRange, StoreError};

struct Sandbox {
    _dir: tempfile::TempDir,
    store: AnnotationStore,
    document: PathBuf,
}

fn sandbox(contents: &str) -> Sandbox {
    let dir = tempfile::TempDir::new().unwrap();
    let document = dir.path().join("notes.md");
    fs::write(&document, contents).unwrap();
    let store = AnnotationStore::new(dir.path().join("store"));
    Sandbox {
        _dir: dir,
        store,
        document,
    }
}

#[test]
fn full_annotation_lifecycle() {
    let sb = sandbox("# Notes\n\nFirst.\n");

    // First load: no record, empty file carrying the current hash
    let mut file = sb.store.load(&sb.document).unwrap();
    assert!(file.comments.is_empty(), "fresh record should have no comments");
    assert_eq!(file.file, sb.document, "record should hold the absolute path");
    assert_eq!(
        file.file_hash,
        content_hash(&sb.document).unwrap(),
        "fresh record should carry a baseline hash"
    );
    assert!(!sb.store.root().exists(), "load must not create the store");

    // Add two comments and save
    file.add(Comment::new(SourceRange::new(3, 3), "First.", "expand this"));
    file.add(Comment::new(SourceRange::new(1, 1), "# Notes", "rename\nmaybe"));
    sb.store.save(&file).unwrap();
    let record = sb.store.store_path(&sb.document);
    assert!(record.exists(), "record should exist after save");

    // Reload equals what was saved
    let reloaded = sb.store.load(&sb.document).unwrap();
    assert_eq!(reloaded, file, "round trip should preserve every field");

    // Record is pretty JSON with the documented field names
    let text = fs::read_to_string(&record).unwrap();
    assert!(text.contains("\"source_start\": 3"), "record: {text}");
    assert!(text.contains("\"comment\": \"expand this\""), "record: {text}");
    assert!(text.contains('\n'), "record should be multi-line");

    // No temp files left behind
    let leftovers: Vec<_> = fs::read_dir(sb.store.root())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p != &record)
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");

    // Editing the document makes the record stale but still loadable
    assert!(!sb.store.is_stale(&reloaded).unwrap());
    fs::write(&sb.document, "# Notes\n\nFirst, edited.\n").unwrap();
    assert!(sb.store.is_stale(&reloaded).unwrap(), "hash mismatch should be stale");
    let after_edit = sb.store.load(&sb.document).unwrap();
    assert_eq!(after_edit.comments.len(), 2, "staleness never drops comments");
}

#[test]
fn save_overwrites_previous_record() {
    let sb = sandbox("text\n");
    let mut file = sb.store.load(&sb.document).unwrap();
    file.add(Comment::new(SourceRange::line(1), "text", "one"));
    sb.store.save(&file).unwrap();

    let id = file.comments[0].id.clone();
    assert!(file.remove(&id));
    sb.store.save(&file).unwrap();

    let reloaded = sb.store.load(&sb.document).unwrap();
    assert!(reloaded.comments.is_empty(), "delete should persist");
}

#[test]
fn malformed_record_is_a_hard_error() {
    let sb = sandbox("text\n");
    let record = sb.store.store_path(&sb.document);
    fs::create_dir_all(record.parent().unwrap()).unwrap();
    fs::write(&record, "{ not json").unwrap();

    match sb.store.load(&sb.document) {
        Err(StoreError::Corrupt { path, .. }) => assert_eq!(path, record),
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

#[test]
fn inverted_range_is_rejected() {
    let sb = sandbox("text\n");
    let record = sb.store.store_path(&sb.document);
    fs::create_dir_all(record.parent().unwrap()).unwrap();
    let body = format!(
        r#"{{"file": "{}", "file_hash": "x", "comments": [
            {{"id": "a", "source_start": 5, "source_end": 2, "selected_text": "",
              "comment": "c", "created_at": "2025-01-01T00:00:00Z"}}]}}"#,
        sb.document.display()
    );
    fs::write(&record, body).unwrap();

    assert!(matches!(
        sb.store.load(&sb.document),
        Err(StoreError::Corrupt { .. })
    ));
}

#[test]
fn missing_document_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = AnnotationStore::new(dir.path());
    let err = store.load(&dir.path().join("absent.md")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
}
